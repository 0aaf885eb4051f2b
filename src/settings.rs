//! Presentation preferences
//!
//! Nothing here changes gameplay. Settings only shape how events reach the
//! player: volumes, screen shake, particles. They live for the session.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music layer volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Camera shake on kills and hits
    pub screen_shake: bool,
    /// Kill particle bursts
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, fewer particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,

            screen_shake: true,
            particles: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Gain applied to one-shot sounds
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Gain applied to the looping music layers
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether screen shake should play (respects reduced motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Particle count after preferences; 0 disables the burst
    pub fn effective_particles(&self, count: u32) -> u32 {
        if !self.particles {
            0
        } else if self.reduced_motion {
            count / 4
        } else {
            count
        }
    }

    /// Whether a purely cosmetic event should reach the engine
    ///
    /// Gameplay-relevant events always pass.
    pub fn allows(&self, event: &GameEvent) -> bool {
        match event {
            GameEvent::CameraShake { .. } => self.effective_screen_shake(),
            GameEvent::ParticleBurst { count, .. } => self.effective_particles(*count) > 0,
            _ => true,
        }
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
