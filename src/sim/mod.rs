//! Deterministic gameplay core
//!
//! All rules live here; the engine owns bodies, rendering and sound. This
//! module must stay pure and deterministic:
//! - Fixed timestep only, timers on the game clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Engine side effects go out as `GameEvent`s

pub mod chunk;
pub mod combat;
pub mod life;
pub mod mix;
pub mod momentum;
pub mod state;
pub mod tick;
pub mod timers;

pub use chunk::{BIOMES, Biome, Chunk, Pattern, Platform, Terrain, biome_index_for, generate_chunk};
pub use combat::{ContactFaces, ContactView, Outcome, PreFilter, Reaction, post_contact, pre_filter, resolve};
pub use life::{LifePhase, restart, take_damage};
pub use mix::{Crossfade, MELODY, SoundCue, SoundKey, combo_cue, crossfade_volumes, note_for_combo};
pub use momentum::Jump;
pub use state::{BodyCommand, Enemy, GameEvent, GameState, Hud, Player};
pub use tick::{
    BodyFeedback, EnemyContact, FixedStep, TickInput, on_enemy_contact, on_enemy_prefilter,
    on_land, tick,
};
pub use timers::{Scheduler, TimerEvent};
