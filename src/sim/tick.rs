//! Fixed timestep simulation tick
//!
//! Advances the scene deterministically: apply the click (if any), then let
//! every entity animate and drop the ones that report they are done.

use super::pick::{Hit, Ray, pick};
use super::state::Scene;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// World-space click ray (mouse/touch)
    pub click: Option<Ray>,
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) {
    scene.time_ticks += 1;

    if let Some(ray) = input.click {
        match pick(scene, &ray) {
            Some(Hit::Nugget(id)) => scene.click_nugget(id),
            Some(Hit::Cell(id)) => scene.click_cell(&id),
            None => {}
        }
    }

    for cell in &mut scene.cells {
        cell.update(dt);
    }

    let mut finished = Vec::new();
    for nugget in &mut scene.nuggets {
        if nugget.update(dt) {
            finished.push(nugget.id);
        }
    }
    for id in finished {
        scene.on_nugget_collected(id);
    }

    scene.particles.retain_mut(|p| p.update(dt));

    // Ensure deterministic ordering
    scene.normalize_order();
}
