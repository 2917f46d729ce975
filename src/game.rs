//! Fixed-timestep game driver
//!
//! Owns the scene and the scoreboard. Frame time is accumulated and spent in
//! `SIM_DT` ticks; after each tick the scene's events are forwarded to the
//! scoreboard, which is the only place scoring policy lives.

use crate::consts::*;
use crate::score::ScoreBoard;
use crate::sim::{GameEvent, Ray, Scene, TickInput, tick};
use glam::Vec3;

/// One play session
#[derive(Debug, Clone)]
pub struct Game {
    pub scene: Scene,
    pub score: ScoreBoard,
    /// Pending input for the next tick
    pub input: TickInput,
    accumulator: f32,
}

impl Game {
    /// New session with the grid already laid down
    pub fn new(seed: u64) -> Self {
        let mut scene = Scene::new(seed);
        scene.init_grid();
        Self {
            scene,
            score: ScoreBoard::new(),
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Start over with a fresh grid and zeroed score
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(seed);
        log::info!("Game restarted with seed: {}", seed);
    }

    /// Queue a click for the next tick (last click in a frame wins)
    pub fn click(&mut self, ray: Ray) {
        self.input.click = Some(ray);
    }

    /// Run as many simulation ticks as the elapsed frame time allows.
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog rather than chase it on later frames
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        let input = self.input.clone();
        tick(&mut self.scene, &input, SIM_DT);

        // Clear one-shot inputs after processing
        self.input.click = None;

        let now = self.scene.time_ticks;
        self.score.expire(now);
        for event in self.scene.drain_events() {
            self.apply(event, now);
        }
    }

    fn apply(&mut self, event: GameEvent, now: u64) {
        match event {
            GameEvent::CellExcavated { .. } => self.score.record_dig(),
            GameEvent::NuggetCollected { id } => {
                let bonus = self.score.record_collection(now);
                log::info!(
                    "Nugget {} collected: +{} gold (total {}, combo x{})",
                    id,
                    bonus,
                    self.score.gold,
                    self.score.combo
                );
            }
            GameEvent::CellDug { .. }
            | GameEvent::NuggetSpawned { .. }
            | GameEvent::NuggetClicked { .. } => {}
        }
    }

    /// Dig straight down one column with clicks from above, collecting every
    /// nugget on the way. A flying nugget still catches clicks, so each one is
    /// allowed to finish before digging resumes.
    pub fn dig_column(&mut self, x: f32, z: f32) {
        let from_above = |x: f32, z: f32| Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y);

        for _ in GRID_Y_MIN..=GRID_Y_MAX {
            for _ in 0..MAX_DIG_LEVEL {
                self.click(from_above(x, z));
                self.step();
            }
            // Let any nugget grow in before clicking it
            for _ in 0..TICKS_PER_SECOND / 4 {
                self.step();
            }
            let uncollected: Vec<Vec3> = self
                .scene
                .nuggets
                .iter()
                .filter(|n| !n.collected)
                .map(|n| n.render_pos())
                .collect();
            if uncollected.is_empty() {
                continue;
            }
            for pos in uncollected {
                self.click(from_above(pos.x, pos.z));
                self.step();
            }
            for _ in 0..NUGGET_COLLECT_DELAY_TICKS {
                self.step();
            }
        }
    }

    /// Cells left in the ground
    pub fn blocks_remaining(&self) -> usize {
        self.scene.cells.len()
    }
}
