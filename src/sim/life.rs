//! Lives, invulnerability and episode restart
//!
//! Alive -> hit -> Invulnerable (flicker) -> Alive, or
//! Alive -> last life lost -> Dead -> restart delay -> fresh episode.

use glam::Vec2;
use serde::Serialize;

use super::chunk::Terrain;
use super::mix::{Crossfade, SoundCue, SoundKey};
use super::state::{BodyCommand, GameEvent, GameState, Player};
use super::timers::TimerEvent;
use crate::consts::*;

/// Alpha of the player body during the dim half of a flicker
pub const FLICKER_DIM_ALPHA: f32 = 0.2;

/// Where the player is in the life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifePhase {
    Alive,
    Invulnerable,
    Dead,
}

impl Player {
    pub fn life_phase(&self) -> LifePhase {
        if self.lives == 0 {
            LifePhase::Dead
        } else if self.invulnerable {
            LifePhase::Invulnerable
        } else {
            LifePhase::Alive
        }
    }
}

/// Apply one hit; returns false if the player had no lives left
///
/// Invulnerability is checked by callers that should respect it (enemy
/// contact); the death plane always hurts.
pub fn take_damage(state: &mut GameState) -> bool {
    if state.player.lives == 0 {
        return false;
    }

    state.player.lives -= 1;
    log::info!(
        "Player hit at x={:.0}, {} lives left",
        state.player.pos.x,
        state.player.lives
    );
    state.emit(GameEvent::Sound(SoundCue {
        key: SoundKey::Fail,
        detune_cents: 0,
        volume: state.tuning.fail_volume,
    }));

    state.player.momentum = 0;
    state.player.combo = 0;
    state.crossfade = Crossfade {
        melodic: 0.0,
        ..state.crossfade
    };
    state.emit(GameEvent::LayerVolumes(state.crossfade));

    state.set_fill(PLAYER_HURT_COLOR);
    state.emit(GameEvent::CameraShake {
        duration_ms: 200.0,
        intensity: 0.02,
    });
    let knockback = Vec2::new(
        state.tuning.knockback_velocity_x,
        state.tuning.knockback_velocity_y,
    );
    state.player.vel = knockback;
    state.player.knockback_pending = true;
    state.body(BodyCommand::SetVelocityY(knockback.y));
    state.body(BodyCommand::SetVelocityX(knockback.x));

    // Flicker: dim now, then alternate every step until the window closes
    state.player.invulnerable = true;
    state.player.flicker_generation = state.player.flicker_generation.wrapping_add(1);
    state.body(BodyCommand::SetAlpha(FLICKER_DIM_ALPHA));
    let generation = state.player.flicker_generation;
    for step in 1..=state.tuning.flicker_steps {
        let delay = state.tuning.flicker_step_ms * f64::from(step);
        state
            .timers
            .schedule(delay, TimerEvent::FlickerStep { generation, step });
    }

    state.refresh_hud();

    if state.player.lives == 0 {
        log::info!(
            "Player died with {} XP, restarting in {}ms",
            state.player.total_xp,
            state.tuning.restart_delay_ms
        );
        state
            .timers
            .schedule_uncancellable(state.tuning.restart_delay_ms, TimerEvent::Restart);
    }
    true
}

/// Advance the damage flicker; the last step ends invulnerability
pub(crate) fn on_flicker_step(state: &mut GameState, generation: u32, step: u8) {
    if generation != state.player.flicker_generation || !state.player.invulnerable {
        log::trace!("stale flicker step {} (generation {})", step, generation);
        return;
    }

    if step >= state.tuning.flicker_steps {
        state.player.invulnerable = false;
        state.set_fill(PLAYER_IDLE_COLOR);
        state.body(BodyCommand::SetAlpha(1.0));
        log::debug!("invulnerability over");
    } else {
        let alpha = if step % 2 == 1 { 1.0 } else { FLICKER_DIM_ALPHA };
        state.body(BodyCommand::SetAlpha(alpha));
    }
}

/// Reset to a fresh episode: lives, XP, position, momentum, combo, world
pub fn restart(state: &mut GameState) {
    log::info!("Restarting after episode {}", state.episode);
    state.timers.invalidate();
    state.player = Player::new(&state.tuning);
    state.enemies.clear();
    state.terrain = Terrain::starting_at(state.tuning.first_chunk_x);
    state.crossfade = Crossfade {
        melodic: 0.0,
        ambient: state.tuning.layer_volume,
    };
    state.time_ticks = 0;
    state.emit(GameEvent::SceneRestarted);
    state.start_episode();
}
