//! Dig Deep - A 3D block-digging treasure game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, nuggets, particles, hit testing)
//! - `score`: Gold/dig counters and the combo decay timer
//! - `game`: Fixed-timestep driver tying the simulation to the scoreboard
//! - `camera`: Fixed perspective camera and click rays
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences

pub mod camera;
pub mod game;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use camera::Camera;
pub use game::Game;
pub use score::ScoreBoard;
pub use settings::{QualityPreset, Settings, SettingsControl};

use glam::IVec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u64 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Grid bounds (inclusive)
    pub const GRID_X_MIN: i32 = -4;
    pub const GRID_X_MAX: i32 = 4;
    pub const GRID_Y_MIN: i32 = -5;
    pub const GRID_Y_MAX: i32 = 0;
    pub const GRID_Z_MIN: i32 = -4;
    pub const GRID_Z_MAX: i32 = 4;

    /// Gold odds: base + per_depth * depth, rolled once per cell at grid creation
    pub const GOLD_BASE_CHANCE: f32 = 0.02;
    pub const GOLD_CHANCE_PER_DEPTH: f32 = 0.03;

    /// Clicks needed to excavate a cell
    pub const MAX_DIG_LEVEL: u8 = 3;
    /// Edge length of a full-size cell
    pub const CELL_SIZE: f32 = 0.95;
    /// Cell scale at the dig threshold (linear from 1.0)
    pub const BLOCK_MIN_SCALE: f32 = 0.4;
    /// How fast the displayed cell scale catches up with the dug level (1/s)
    pub const BLOCK_SCALE_EASE: f32 = 15.0;

    /// Spawn offset above the dug cell for particles and nuggets
    pub const SPAWN_OFFSET_Y: f32 = 0.5;

    /// Dirt particles per excavation
    pub const PARTICLES_PER_DIG: usize = 8;
    /// Horizontal launch speed range (x and z)
    pub const PARTICLE_SPREAD: f32 = 4.0;
    /// Vertical launch speed range
    pub const PARTICLE_UP_MIN: f32 = 2.0;
    pub const PARTICLE_UP_MAX: f32 = 8.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Opacity lost per second
    pub const PARTICLE_FADE_RATE: f32 = 2.0;
    /// Rendered edge length of a particle
    pub const PARTICLE_SIZE: f32 = 0.1;

    /// Nugget idle animation
    pub const NUGGET_RADIUS: f32 = 0.3;
    pub const NUGGET_SPIN_SPEED: f32 = 2.0;
    pub const NUGGET_GROW_RATE: f32 = 3.0;
    pub const NUGGET_BOB_SPEED: f32 = 2.0;
    pub const NUGGET_BOB_HEIGHT: f32 = 0.1;
    /// Nugget fly-away animation after collection
    pub const NUGGET_RISE_SPEED: f32 = 3.0;
    pub const NUGGET_SHRINK_RATE: f32 = 2.0;
    /// Delay between clicking a nugget and crediting/removing it (0.5 s)
    pub const NUGGET_COLLECT_DELAY_TICKS: u32 = 60;

    /// Idle window before the combo resets (2 s)
    pub const COMBO_WINDOW_TICKS: u64 = 2 * TICKS_PER_SECOND;
    /// Combo steps per extra gold of bonus
    pub const COMBO_BONUS_STEP: u32 = 3;
}

/// Stable key for a grid position, `"x-y-z"`
pub fn cell_id(pos: IVec3) -> String {
    format!("{}-{}-{}", pos.x, pos.y, pos.z)
}

/// Convert elapsed ticks to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
