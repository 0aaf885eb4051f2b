//! Momentum Runner - gameplay core of an endless-runner platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (momentum, chunks, combat, lives, timers)
//! - `audio`: Turns sound cues and layer volumes into playback requests
//! - `settings`: Presentation preferences (volumes, shake, particles)
//! - `tuning`: Data-driven game balance
//!
//! The physics/rendering engine stays outside: it feeds `sim::tick` with input
//! and body feedback, forwards collision callbacks, and drains `GameEvent`s.

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioMixer, LayerGains, PlayRequest};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, matches the physics step)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hard cap on lives, whatever the tuning says
    pub const MAX_LIVES: u8 = 3;

    /// Body sizes handed to the engine when it builds colliders
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const PLATFORM_THICKNESS: f32 = 32.0;

    /// Player palette
    pub const PLAYER_IDLE_COLOR: u32 = 0x00ffff;
    pub const PLAYER_LETHAL_COLOR: u32 = 0xffaa00;
    pub const PLAYER_LANDED_COLOR: u32 = 0x00ff00;
    pub const PLAYER_HURT_COLOR: u32 = 0xff0000;

    /// Enemy palette
    pub const ENEMY_COLOR: u32 = 0xff0000;
    pub const ENEMY_FLASH_COLOR: u32 = 0xffffff;

    /// Floating text colors
    pub const CRIT_TEXT_COLOR: u32 = 0xff00ff;
    pub const XP_TEXT_COLOR: u32 = 0x00ff00;
}
