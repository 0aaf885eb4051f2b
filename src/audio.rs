//! Audio output shaping
//!
//! The core emits `SoundCue`s and layer volumes; the mixer scales them by the
//! player's settings and hands `PlayRequest`s to whatever backend plays
//! sound. No samples or synthesis here.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{Crossfade, GameEvent, SoundCue, SoundKey};

/// One sound for the playback backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayRequest {
    /// Asset key
    pub key: &'static str,
    /// Pitch shift in cents
    pub detune_cents: i32,
    /// Final gain (0.0 - 1.0)
    pub volume: f32,
}

/// Gains for the two looping music layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerGains {
    pub melodic: f32,
    pub ambient: f32,
}

/// Applies volume preferences to core audio output
#[derive(Debug, Clone, Default)]
pub struct AudioMixer {
    settings: Settings,
}

impl AudioMixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.settings.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.settings.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Scale a one-shot cue; `None` if it would be silent
    pub fn play(&self, cue: &SoundCue) -> Option<PlayRequest> {
        let volume = (cue.volume * self.settings.effective_sfx_volume()).clamp(0.0, 1.0);
        if volume <= 0.0 {
            return None;
        }
        Some(PlayRequest {
            key: cue.key.as_str(),
            detune_cents: cue.detune_cents,
            volume,
        })
    }

    /// Scale the crossfade for the music layers
    pub fn layer_gains(&self, crossfade: Crossfade) -> LayerGains {
        let music = self.settings.effective_music_volume();
        LayerGains {
            melodic: crossfade.melodic * music,
            ambient: crossfade.ambient * music,
        }
    }

    /// Collect play requests for every sound event in a drained batch
    pub fn requests_for(&self, events: &[GameEvent]) -> Vec<PlayRequest> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Sound(cue) => self.play(cue),
                _ => None,
            })
            .collect()
    }

    /// Keys the backend must have loaded before the first tick
    pub fn required_keys() -> [&'static str; 7] {
        [
            SoundKey::Note1,
            SoundKey::Note2,
            SoundKey::Note3,
            SoundKey::Note4,
            SoundKey::Fail,
            SoundKey::Noise,
            SoundKey::SaxLayer,
        ]
        .map(|key| key.as_str())
    }
}
