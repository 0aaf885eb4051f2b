//! Momentum and bunny-hop chaining
//!
//! Momentum is an integer speed bonus: chain jumps add to it, standing on the
//! ground bleeds it off. A landing opens a short grace window during which the
//! next jump still counts as a chain.

use serde::Serialize;

use super::state::Player;
use crate::tuning::Tuning;

/// Kind of jump taken, with the vertical impulse to apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Jump {
    /// Bunny-hop: momentum and combo went up
    Chain { impulse: f32 },
    /// Fresh jump: combo was reset
    Base { impulse: f32 },
}

impl Jump {
    pub fn impulse(&self) -> f32 {
        match *self {
            Jump::Chain { impulse } | Jump::Base { impulse } => impulse,
        }
    }
}

impl Player {
    /// Bleed momentum while grounded; airborne momentum is kept
    pub fn apply_ground_friction(&mut self, grounded: bool, tuning: &Tuning) {
        if grounded {
            self.momentum = self.momentum.saturating_sub(tuning.ground_friction);
        }
    }

    /// Resolve a jump press; `None` when airborne
    pub fn on_jump(&mut self, grounded: bool, tuning: &Tuning) -> Option<Jump> {
        if !grounded {
            return None;
        }
        if self.bunny_hopping {
            self.momentum = self
                .momentum
                .saturating_add(tuning.chain_momentum_gain)
                .min(tuning.max_momentum);
            self.combo += 1;
            Some(Jump::Chain {
                impulse: tuning.chain_jump_velocity,
            })
        } else {
            self.combo = 0;
            Some(Jump::Base {
                impulse: tuning.base_jump_velocity,
            })
        }
    }

    /// Fast enough to kill enemies on contact
    pub fn is_lethal(&self, tuning: &Tuning) -> bool {
        self.momentum >= tuning.kill_speed_threshold
    }

    /// Touchdown: chaining stays possible until the grace window expires
    pub fn begin_landing(&mut self) {
        self.bunny_hopping = true;
    }

    /// Grace window elapsed; returns true when the combo was broken
    ///
    /// Only applies if the player is still on the ground. Standing still after
    /// a hop that carried momentum ends the combo even without damage.
    pub fn expire_landing_grace(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.bunny_hopping = false;
        if self.momentum > 0 && self.combo > 0 {
            self.combo = 0;
            return true;
        }
        false
    }

    /// Speed-kill cost
    pub fn halve_momentum(&mut self) {
        self.momentum /= 2;
    }
}
