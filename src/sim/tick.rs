//! Fixed timestep simulation tick
//!
//! Per-frame driver plus the collision callbacks the engine forwards. The
//! order inside `tick` matters: timers, mix, terrain, friction, movement,
//! fast-fall, visuals, jump, HUD, death plane.

use glam::Vec2;

use super::combat::{ContactFaces, ContactView, PreFilter, Reaction, post_contact, pre_filter};
use super::life::{on_flicker_step, restart, take_damage};
use super::mix::{KILL_NOTE, POGO_KILL_DETUNE, SoundCue, combo_cue, crossfade_volumes};
use super::momentum::Jump;
use super::state::{BodyCommand, GameEvent, GameState};
use super::timers::TimerEvent;
use crate::consts::*;

/// Squash applied to the player body while fast-falling
pub const FAST_FALL_SCALE: Vec2 = Vec2::new(0.6, 1.4);

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Down held: fast-fall in the air, pogo on enemies
    pub down: bool,
    /// Jump key went down since the last tick
    pub jump_pressed: bool,
}

/// Player body state reported by the engine each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFeedback {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Touching ground on the bottom face
    pub grounded: bool,
}

/// Player vs enemy contact as seen by the engine's pre-collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyContact {
    pub enemy_id: u32,
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    pub enemy_pos: Vec2,
    /// Down key held at the moment of contact
    pub pogo: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, feedback: &BodyFeedback, dt: f32) {
    state.time_ticks += 1;
    state.player.pos = feedback.pos;
    // Knockback issued since the last drain is newer than what the engine saw
    if !state.player.knockback_pending {
        state.player.vel = feedback.vel;
    }
    state.player.grounded = feedback.grounded;

    // Deferred effects first; a restart replaces the whole scene, so the
    // engine's feedback for this frame no longer applies
    state.timers.advance(f64::from(dt) * 1000.0);
    if fire_timers(state) {
        return;
    }

    // Music layers follow momentum directly
    let mix = crossfade_volumes(
        state.player.momentum,
        state.tuning.crossfade_full_momentum,
        state.tuning.layer_volume,
    );
    state.crossfade = mix;
    state.emit(GameEvent::LayerVolumes(mix));

    // Keep terrain ahead of the camera (one chunk per frame at most)
    if state
        .terrain
        .needs_chunk(state.player.pos.x, state.tuning.generation_lookahead)
    {
        state.spawn_chunk(false);
    }

    state
        .player
        .apply_ground_friction(feedback.grounded, &state.tuning);

    // Horizontal movement; during invulnerability only once knockback has died down
    let speed = state.tuning.base_speed + state.player.momentum as f32;
    if !state.player.invulnerable
        || state.player.vel.x.abs() < state.tuning.invulnerable_input_max_speed
    {
        if input.left {
            state.body(BodyCommand::SetVelocityX(-speed));
        } else if input.right {
            state.body(BodyCommand::SetVelocityX(speed));
        }
    }

    // Fast-fall
    let fast_falling = input.down && !feedback.grounded;
    if fast_falling != state.player.fast_falling {
        state.player.fast_falling = fast_falling;
        let (gravity, scale) = if fast_falling {
            (state.tuning.fast_fall_gravity_y, FAST_FALL_SCALE)
        } else {
            (state.tuning.gravity_y, Vec2::ONE)
        };
        state.body(BodyCommand::SetGravityY(gravity));
        state.body(BodyCommand::SetScale(scale));
    }

    // Lethality tint
    if !state.player.invulnerable && !state.player.bunny_hopping {
        let color = lethal_color(state, PLAYER_IDLE_COLOR);
        state.set_fill(color);
    }

    if input.jump_pressed {
        match state.player.on_jump(feedback.grounded, &state.tuning) {
            Some(Jump::Chain { impulse }) => {
                state.body(BodyCommand::SetVelocityY(impulse));
                let cue = combo_cue(state.player.combo, state.tuning.note_volume);
                state.emit(GameEvent::Sound(cue));
                log::debug!(
                    "chain jump: momentum {} combo {}",
                    state.player.momentum,
                    state.player.combo
                );
            }
            Some(Jump::Base { impulse }) => {
                state.body(BodyCommand::SetVelocityY(impulse));
            }
            None => {}
        }
    }

    state.refresh_hud();

    // Fell out of the world
    if feedback.pos.y > state.tuning.death_plane_y {
        take_damage(state);
        if state.player.lives > 0 {
            let respawn = Vec2::new(feedback.pos.x, state.tuning.respawn_y);
            state.player.pos = respawn;
            state.player.vel = Vec2::ZERO;
            state.body(BodyCommand::SetPosition(respawn));
            state.body(BodyCommand::SetVelocity(Vec2::ZERO));
        }
    }
    state.player.knockback_pending = false;
}

/// Fire every due timer; returns true if the episode restarted
fn fire_timers(state: &mut GameState) -> bool {
    let mut restarted = false;
    while let Some(event) = state.timers.pop_due() {
        match event {
            TimerEvent::LandingGrace => on_landing_grace(state),
            TimerEvent::FlickerStep { generation, step } => {
                on_flicker_step(state, generation, step);
            }
            TimerEvent::EnemyFlashEnd { enemy_id } => {
                if state.enemy(enemy_id).is_some_and(|e| e.active) {
                    state.emit(GameEvent::EnemyFill {
                        id: enemy_id,
                        color: ENEMY_COLOR,
                    });
                }
            }
            TimerEvent::Restart => {
                restart(state);
                restarted = true;
            }
        }
    }
    restarted
}

fn lethal_color(state: &GameState, otherwise: u32) -> u32 {
    if state.player.is_lethal(&state.tuning) {
        PLAYER_LETHAL_COLOR
    } else {
        otherwise
    }
}

fn on_landing_grace(state: &mut GameState) {
    if !state.player.grounded {
        return;
    }
    let combo_broken = state.player.expire_landing_grace();
    let color = lethal_color(state, PLAYER_IDLE_COLOR);
    state.set_fill(color);
    if combo_broken {
        log::debug!("combo dropped after landing");
        state.refresh_hud();
    }
}

/// Ground collision callback
///
/// Only a touchdown counts; repeated contacts while already grounded are
/// ignored so the grace window runs from the first frame on the ground.
///
/// Call it from the physics step, before the `tick` whose feedback first
/// reports `grounded`. Called after that tick, the player already counts as
/// grounded and the landing is dropped.
pub fn on_land(state: &mut GameState) {
    if state.player.grounded {
        return;
    }
    state.player.grounded = true;
    state.player.begin_landing();
    let color = lethal_color(state, PLAYER_LANDED_COLOR);
    state.set_fill(color);
    state
        .timers
        .schedule(state.tuning.landing_grace_ms, TimerEvent::LandingGrace);
}

/// Pre-collision callback; returns whether the engine should resolve the
/// contact physically
///
/// Kills happen here, before any physical response.
pub fn on_enemy_prefilter(state: &mut GameState, contact: &EnemyContact) -> bool {
    state.player.pos = contact.player_pos;
    if !state.player.knockback_pending {
        state.player.vel = contact.player_vel;
    }

    let Some(enemy) = state.enemy_mut(contact.enemy_id) else {
        log::warn!("contact with unknown enemy {}", contact.enemy_id);
        return false;
    };
    if enemy.active {
        enemy.pos = contact.enemy_pos;
    }
    let enemy = enemy.clone();

    let view = ContactView::new(&state.player, &enemy, contact.pogo, &state.tuning);
    let decision = pre_filter(&view, &state.tuning);
    log::trace!("enemy {} pre-filter: {:?}", enemy.id, decision);
    match decision {
        PreFilter::PogoKill => kill_enemy(state, enemy.id, true),
        PreFilter::SpeedKill => kill_enemy(state, enemy.id, false),
        PreFilter::Ignore | PreFilter::PassThrough | PreFilter::Collide => {}
    }
    decision.allows_physical()
}

/// Post-collision callback for contacts the pre-filter let through
///
/// Returns `None` if the enemy is gone.
pub fn on_enemy_contact(
    state: &mut GameState,
    enemy_id: u32,
    faces: ContactFaces,
) -> Option<Reaction> {
    if !state.enemy(enemy_id)?.active {
        return None;
    }

    let reaction = post_contact(faces);
    match reaction {
        Reaction::StompBounce => {
            state.body(BodyCommand::SetVelocityY(state.tuning.stomp_bounce_velocity));
            state.player.combo += 1;
            let cue = combo_cue(state.player.combo, state.tuning.note_volume);
            state.emit(GameEvent::Sound(cue));
            state.emit(GameEvent::EnemyFill {
                id: enemy_id,
                color: ENEMY_FLASH_COLOR,
            });
            state
                .timers
                .schedule(state.tuning.enemy_flash_ms, TimerEvent::EnemyFlashEnd { enemy_id });
            state.refresh_hud();
        }
        Reaction::Damage => {
            if !state.player.invulnerable {
                take_damage(state);
            }
        }
    }
    Some(reaction)
}

/// Destroy an enemy and pay out the kill
fn kill_enemy(state: &mut GameState, enemy_id: u32, pogo: bool) {
    let Some(enemy) = state.enemy_mut(enemy_id) else {
        return;
    };
    if !enemy.active {
        return;
    }
    enemy.active = false;
    let pos = enemy.pos;

    state.emit(GameEvent::EnemyDestroyed { id: enemy_id });
    state.emit(GameEvent::ParticleBurst {
        pos,
        count: state.tuning.kill_particles,
    });
    state.emit(GameEvent::CameraShake {
        duration_ms: 100.0,
        intensity: 0.01,
    });
    state.emit(GameEvent::Sound(SoundCue {
        key: KILL_NOTE,
        detune_cents: if pogo { POGO_KILL_DETUNE } else { 0 },
        volume: state.tuning.note_volume,
    }));

    let text_pos = pos - Vec2::new(0.0, 50.0);
    if pogo {
        let xp = state.tuning.pogo_xp;
        state.player.total_xp += xp;
        state.emit(GameEvent::FloatingText {
            pos: text_pos,
            text: format!("CRIT! +{xp} XP"),
            color: CRIT_TEXT_COLOR,
        });
        state.body(BodyCommand::SetVelocityY(state.tuning.pogo_launch_velocity));
    } else {
        let xp = state.tuning.speed_kill_xp;
        state.player.total_xp += xp;
        state.emit(GameEvent::FloatingText {
            pos: text_pos,
            text: format!("+{xp} XP"),
            color: XP_TEXT_COLOR,
        });
        state.player.halve_momentum();
    }
    log::info!(
        "{} kill on enemy {} (xp {})",
        if pogo { "Pogo" } else { "Speed" },
        enemy_id,
        state.player.total_xp
    );
    state.refresh_hud();
}

/// Accumulates variable frame time into fixed simulation steps
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `SIM_DT` steps to run for a frame of `frame_dt` seconds
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
