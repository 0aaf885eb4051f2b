//! Player vs enemy contact resolution
//!
//! The engine reports each contact twice. First it asks whether physical
//! collision should be resolved at all (`pre_filter`); kills and pass-through
//! happen here. Contacts allowed through produce a physical touch, and
//! `post_contact` decides what that touch means from the touching faces.
//!
//! Priority: pogo beats speed-kill beats damage.

use serde::Serialize;

use super::state::{Enemy, Player};
use crate::tuning::Tuning;

/// What the pre-filter needs to know about one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactView {
    pub enemy_active: bool,
    /// Moving downward (engine y grows down)
    pub falling: bool,
    /// Clearly above the enemy's center
    pub above: bool,
    /// Down key held
    pub pogo: bool,
    pub momentum: u32,
}

impl ContactView {
    /// Build a view from the mirrored player and enemy kinematics
    pub fn new(player: &Player, enemy: &Enemy, pogo: bool, tuning: &Tuning) -> Self {
        Self {
            enemy_active: enemy.active,
            falling: player.vel.y > 0.0,
            above: player.pos.y < enemy.pos.y - tuning.above_margin,
            pogo,
            momentum: player.momentum,
        }
    }
}

/// Touching faces reported by the engine after a physical contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactFaces {
    /// Enemy's top face is touching
    pub enemy_up: bool,
    /// Player's bottom face is touching
    pub player_down: bool,
}

impl ContactFaces {
    /// Enemy top against player bottom
    pub fn is_stomp(&self) -> bool {
        self.enemy_up && self.player_down
    }
}

/// First stage: gate physical resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreFilter {
    /// Enemy already gone
    Ignore,
    /// Dropping onto the enemy without pogo: no physical response
    PassThrough,
    PogoKill,
    SpeedKill,
    /// Let the engine collide the bodies; `post_contact` decides the rest
    Collide,
}

impl PreFilter {
    /// Whether the engine should apply physical collision response
    pub fn allows_physical(&self) -> bool {
        matches!(self, PreFilter::Collide)
    }
}

/// Second stage: meaning of a physical touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reaction {
    /// Non-lethal bounce off the enemy's head
    StompBounce,
    Damage,
}

/// Combined outcome of both stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Ignore,
    PogoKill,
    SpeedKill,
    StompBounce,
    Damage,
}

/// Decide whether a contact is a kill, a pass-through, or a real collision
pub fn pre_filter(view: &ContactView, tuning: &Tuning) -> PreFilter {
    if !view.enemy_active {
        return PreFilter::Ignore;
    }
    if view.falling && view.above {
        return if view.pogo {
            PreFilter::PogoKill
        } else {
            PreFilter::PassThrough
        };
    }
    if view.momentum >= tuning.kill_speed_threshold {
        return PreFilter::SpeedKill;
    }
    PreFilter::Collide
}

/// Decide what a physical contact does to the player
pub fn post_contact(faces: ContactFaces) -> Reaction {
    if faces.is_stomp() {
        Reaction::StompBounce
    } else {
        Reaction::Damage
    }
}

/// Run both stages for one contact
pub fn resolve(view: &ContactView, faces: ContactFaces, tuning: &Tuning) -> Outcome {
    match pre_filter(view, tuning) {
        PreFilter::Ignore | PreFilter::PassThrough => Outcome::Ignore,
        PreFilter::PogoKill => Outcome::PogoKill,
        PreFilter::SpeedKill => Outcome::SpeedKill,
        PreFilter::Collide => match post_contact(faces) {
            Reaction::StompBounce => Outcome::StompBounce,
            Reaction::Damage => Outcome::Damage,
        },
    }
}
