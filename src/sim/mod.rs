//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid order for cells, id order for nuggets)
//! - No rendering or platform dependencies

pub mod pick;
pub mod state;
pub mod tick;

pub use pick::{Hit, Ray, pick, ray_aabb, ray_sphere};
pub use state::{DirtParticle, Excavation, GameEvent, GridCell, Nugget, Scene};
pub use tick::{TickInput, tick};
