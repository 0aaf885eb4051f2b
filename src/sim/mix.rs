//! Combo melody and music-layer crossfade
//!
//! Both are pure functions of game state: the melody note is indexed by the
//! combo count, the layer volumes by momentum. Nothing here is smoothed or
//! timed, so the mix tracks the simulation frame by frame.

use serde::Serialize;

/// Sound assets the core can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundKey {
    Note1,
    Note2,
    Note3,
    Note4,
    /// Damage sting
    Fail,
    /// Ambient layer, loudest at rest
    Noise,
    /// Melodic layer, loudest at full speed
    SaxLayer,
}

impl SoundKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKey::Note1 => "note1",
            SoundKey::Note2 => "note2",
            SoundKey::Note3 => "note3",
            SoundKey::Note4 => "note4",
            SoundKey::Fail => "fail",
            SoundKey::Noise => "noise",
            SoundKey::SaxLayer => "sax_layer",
        }
    }
}

/// One entry of the combo melody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MelodyNote {
    pub key: SoundKey,
    pub detune_cents: i32,
}

/// Combo melody, indexed by `combo % len` and wrapping forever
pub const MELODY: [MelodyNote; 6] = [
    MelodyNote {
        key: SoundKey::Note1,
        detune_cents: 0,
    },
    MelodyNote {
        key: SoundKey::Note2,
        detune_cents: 0,
    },
    MelodyNote {
        key: SoundKey::Note3,
        detune_cents: 0,
    },
    MelodyNote {
        key: SoundKey::Note4,
        detune_cents: 0,
    },
    MelodyNote {
        key: SoundKey::Note3,
        detune_cents: 200,
    },
    MelodyNote {
        key: SoundKey::Note4,
        detune_cents: 500,
    },
];

/// Kill sting: top note, raised for pogo kills
pub const KILL_NOTE: SoundKey = SoundKey::Note4;
pub const POGO_KILL_DETUNE: i32 = 200;

/// A one-shot sound the engine should play
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoundCue {
    pub key: SoundKey,
    pub detune_cents: i32,
    pub volume: f32,
}

/// Melody note for a combo count
pub fn note_for_combo(combo: u32) -> MelodyNote {
    MELODY[combo as usize % MELODY.len()]
}

/// Cue for the melody note of `combo`
pub fn combo_cue(combo: u32, volume: f32) -> SoundCue {
    let note = note_for_combo(combo);
    SoundCue {
        key: note.key,
        detune_cents: note.detune_cents,
        volume,
    }
}

/// Volumes of the two looping music layers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Crossfade {
    pub melodic: f32,
    pub ambient: f32,
}

/// Crossfade for a momentum value
///
/// `full_momentum` is where the melodic layer reaches `layer_volume`; beyond
/// it the mix stays saturated.
pub fn crossfade_volumes(momentum: u32, full_momentum: f32, layer_volume: f32) -> Crossfade {
    let progress = (momentum as f32 / full_momentum).clamp(0.0, 1.0);
    Crossfade {
        melodic: progress * layer_volume,
        ambient: (1.0 - progress) * layer_volume,
    }
}
