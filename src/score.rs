//! Session scoring
//!
//! Gold, digs, and the combo streak. The combo decays through a single
//! deadline tick: each collection pushes it out, and once the clock reaches
//! it the streak drops back to zero.

use crate::consts::{COMBO_BONUS_STEP, COMBO_WINDOW_TICKS};

/// Score counters for one play session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub gold: u64,
    pub digs: u64,
    pub combo: u32,
    /// Tick at which the combo resets unless another nugget is collected
    pub combo_deadline: Option<u64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gold awarded for a collection at the given combo
    #[inline]
    pub fn bonus_for(combo: u32) -> u64 {
        (combo / COMBO_BONUS_STEP) as u64 + 1
    }

    /// Bonus the next collection would award
    pub fn next_bonus(&self) -> u64 {
        Self::bonus_for(self.combo)
    }

    /// Any excavation, gold or not
    pub fn record_dig(&mut self) {
        self.digs += 1;
    }

    /// Credit a nugget collected at tick `now`. Returns the bonus awarded.
    pub fn record_collection(&mut self, now: u64) -> u64 {
        self.expire(now);
        let bonus = self.next_bonus();
        self.gold += bonus;
        self.combo += 1;
        self.combo_deadline = Some(now + COMBO_WINDOW_TICKS);
        bonus
    }

    /// Fire the combo timer if its deadline has passed
    pub fn expire(&mut self, now: u64) {
        if let Some(deadline) = self.combo_deadline {
            if now >= deadline {
                if self.combo > 0 {
                    log::debug!("Combo x{} expired", self.combo);
                }
                self.combo = 0;
                self.combo_deadline = None;
            }
        }
    }
}
