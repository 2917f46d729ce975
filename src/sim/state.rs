//! Scene state and core entity types
//!
//! The scene owns three flat collections (cells, nuggets, particles) and is
//! their only mutator. Entities animate themselves; the scene decides membership.

use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{cell_id, lerp};

/// Notifications emitted by the scene for the shell to consume
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A cell took a click but is not excavated yet
    CellDug { id: String, level: u8 },
    /// A cell reached the dig threshold and was removed
    CellExcavated { pos: IVec3, has_gold: bool },
    /// A nugget appeared where a gold cell was excavated
    NuggetSpawned { id: u32, pos: Vec3 },
    /// A nugget was clicked and is flying away
    NuggetClicked { id: u32 },
    /// A nugget finished its fly-away and was removed
    NuggetCollected { id: u32 },
}

/// Reported by a cell the moment it is fully dug out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excavation {
    pub pos: IVec3,
    pub has_gold: bool,
}

/// One excavatable block of ground
#[derive(Debug, Clone)]
pub struct GridCell {
    pub pos: IVec3,
    pub id: String,
    /// Rolled once at grid creation, never recomputed
    pub has_gold: bool,
    /// Rows below the surface
    pub depth: u32,
    pub dug_level: u8,
    /// Displayed scale, eases toward `target_scale`
    pub scale: f32,
}

impl GridCell {
    pub fn new(pos: IVec3, has_gold: bool) -> Self {
        Self {
            pos,
            id: cell_id(pos),
            has_gold,
            depth: (-pos.y).max(0) as u32,
            dug_level: 0,
            scale: 1.0,
        }
    }

    /// Whether the cell still accepts clicks
    #[inline]
    pub fn is_clickable(&self) -> bool {
        self.dug_level < MAX_DIG_LEVEL
    }

    /// Apply one click. Returns the excavation report exactly once, on the
    /// click that reaches the threshold; clicks after that are ignored.
    pub fn dig(&mut self) -> Option<Excavation> {
        if !self.is_clickable() {
            return None;
        }
        self.dug_level += 1;
        if self.dug_level == MAX_DIG_LEVEL {
            Some(Excavation {
                pos: self.pos,
                has_gold: self.has_gold,
            })
        } else {
            None
        }
    }

    /// Scale implied by the current dug level
    pub fn target_scale(&self) -> f32 {
        let t = self.dug_level as f32 / MAX_DIG_LEVEL as f32;
        lerp(1.0, BLOCK_MIN_SCALE, t)
    }

    /// Ease the displayed scale toward the dug level
    pub fn update(&mut self, dt: f32) {
        let target = self.target_scale();
        let k = (BLOCK_SCALE_EASE * dt).min(1.0);
        self.scale += (target - self.scale) * k;
    }

    /// World-space centre of the cell
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.pos.as_vec3()
    }

    /// Half extent of the (scaled) cell box
    #[inline]
    pub fn half_extent(&self) -> f32 {
        CELL_SIZE * self.scale / 2.0
    }
}

/// A collectible gold nugget
#[derive(Debug, Clone)]
pub struct Nugget {
    pub id: u32,
    /// Anchor position (bob and rise are applied on top)
    pub pos: Vec3,
    pub collected: bool,
    pub scale: f32,
    /// Rotation about Y (radians)
    pub spin: f32,
    /// Seconds since spawn, drives the bob
    pub age: f32,
    /// Height gained since collection
    pub rise: f32,
    /// Ticks left before removal, armed by `click`
    pub removal_ticks: Option<u32>,
}

impl Nugget {
    pub fn new(id: u32, pos: Vec3) -> Self {
        Self {
            id,
            pos,
            collected: false,
            scale: 0.0,
            spin: 0.0,
            age: 0.0,
            rise: 0.0,
            removal_ticks: None,
        }
    }

    /// Mark as collected. Returns false if it already was.
    pub fn click(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.removal_ticks = Some(NUGGET_COLLECT_DELAY_TICKS);
        true
    }

    /// Advance one tick. Returns true exactly once: on the tick the
    /// post-collection delay runs out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.spin = (self.spin + NUGGET_SPIN_SPEED * dt) % std::f32::consts::TAU;

        if !self.collected {
            self.scale = (self.scale + NUGGET_GROW_RATE * dt).min(1.0);
            return false;
        }

        self.rise += NUGGET_RISE_SPEED * dt;
        self.scale = (self.scale - NUGGET_SHRINK_RATE * dt).max(0.0);

        match self.removal_ticks {
            Some(0) | None => false,
            Some(n) => {
                self.removal_ticks = Some(n - 1);
                n == 1
            }
        }
    }

    /// Where the nugget is drawn (and hit tested)
    pub fn render_pos(&self) -> Vec3 {
        let bob = if self.collected {
            0.0
        } else {
            (self.age * NUGGET_BOB_SPEED).sin() * NUGGET_BOB_HEIGHT
        };
        self.pos + Vec3::new(0.0, bob + self.rise, 0.0)
    }
}

/// A speck of dirt thrown up by an excavation
#[derive(Debug, Clone, Copy)]
pub struct DirtParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// 1.0 at spawn, fades linearly to 0
    pub opacity: f32,
}

impl DirtParticle {
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self {
            pos,
            vel,
            opacity: 1.0,
        }
    }

    /// Integrate one step. Returns false once the particle has faded out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y -= GRAVITY * dt;
        self.opacity = (self.opacity - PARTICLE_FADE_RATE * dt).max(0.0);
        self.is_alive()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Complete scene state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct Scene {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Active cells (grid order)
    pub cells: Vec<GridCell>,
    /// Active nuggets (sorted by id)
    pub nuggets: Vec<Nugget>,
    /// Visual particles
    pub particles: Vec<DirtParticle>,
    /// Notifications not yet drained by the shell
    pub events: Vec<GameEvent>,
    initialized: bool,
    /// Next nugget ID
    next_id: u32,
}

impl Scene {
    /// Create an empty scene; call `init_grid` to lay down the ground
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            cells: Vec::new(),
            nuggets: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            initialized: false,
            next_id: 1,
        }
    }

    /// Allocate a new nugget ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay down the full grid and roll the treasure map. Runs once per scene.
    pub fn init_grid(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        for x in GRID_X_MIN..=GRID_X_MAX {
            for y in GRID_Y_MIN..=GRID_Y_MAX {
                for z in GRID_Z_MIN..=GRID_Z_MAX {
                    let depth = (-y) as f32;
                    let chance = depth * GOLD_CHANCE_PER_DEPTH + GOLD_BASE_CHANCE;
                    let has_gold = self.rng.random::<f32>() < chance;
                    self.cells.push(GridCell::new(IVec3::new(x, y, z), has_gold));
                }
            }
        }

        log::info!(
            "Grid initialized: {} cells, {} hold gold (seed {})",
            self.cells.len(),
            self.gold_remaining(),
            self.seed
        );
    }

    /// Look up an active cell by its id
    pub fn cell(&self, id: &str) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// Buried gold that has not been dug out yet
    pub fn gold_remaining(&self) -> usize {
        self.cells.iter().filter(|c| c.has_gold).count()
    }

    /// Click a cell. Unknown ids are ignored.
    pub fn click_cell(&mut self, id: &str) {
        let Some(cell) = self.cells.iter_mut().find(|c| c.id == id) else {
            return;
        };
        match cell.dig() {
            Some(excavation) => self.on_cell_excavated(excavation.pos, excavation.has_gold),
            None => {
                let level = cell.dug_level;
                log::debug!("Cell {} dug to level {}", id, level);
                self.events.push(GameEvent::CellDug {
                    id: id.to_string(),
                    level,
                });
            }
        }
    }

    /// Click a nugget. Collected or unknown nuggets ignore the click.
    pub fn click_nugget(&mut self, id: u32) {
        if let Some(nugget) = self.nuggets.iter_mut().find(|n| n.id == id) {
            if nugget.click() {
                self.events.push(GameEvent::NuggetClicked { id });
            }
        }
    }

    /// A cell reached the dig threshold: throw dirt, drop the cell, and
    /// uncover its nugget if it had one
    pub fn on_cell_excavated(&mut self, pos: IVec3, has_gold: bool) {
        self.events.push(GameEvent::CellExcavated { pos, has_gold });

        let spawn = pos.as_vec3() + Vec3::new(0.0, SPAWN_OFFSET_Y, 0.0);
        for _ in 0..PARTICLES_PER_DIG {
            let vel = Vec3::new(
                self.rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
                self.rng.random_range(PARTICLE_UP_MIN..PARTICLE_UP_MAX),
                self.rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            );
            self.particles.push(DirtParticle::new(spawn, vel));
        }

        let id = cell_id(pos);
        self.cells.retain(|c| c.id != id);

        if has_gold {
            let nugget_id = self.next_entity_id();
            self.nuggets.push(Nugget::new(nugget_id, spawn));
            self.events.push(GameEvent::NuggetSpawned {
                id: nugget_id,
                pos: spawn,
            });
            log::info!("Struck gold at {} (nugget {})", id, nugget_id);
        } else {
            log::debug!("Excavated {}", id);
        }
    }

    /// A nugget finished flying away: drop it and credit the collection
    pub fn on_nugget_collected(&mut self, id: u32) {
        let before = self.nuggets.len();
        self.nuggets.retain(|n| n.id != id);
        if self.nuggets.len() != before {
            self.events.push(GameEvent::NuggetCollected { id });
        }
    }

    /// Hand pending notifications to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure nuggets are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.nuggets.sort_by_key(|n| n.id);
    }
}
