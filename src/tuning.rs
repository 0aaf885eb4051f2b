//! Data-driven game balance
//!
//! Every gameplay number lives here so designers can tweak a JSON file instead
//! of the simulation. Missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LIVES;

/// Errors from loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay balance parameters
///
/// Velocities follow engine convention: y grows downward, so upward impulses
/// are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Horizontal speed before momentum is added
    pub base_speed: f32,
    /// Momentum ceiling
    pub max_momentum: u32,
    /// Momentum lost per grounded frame
    pub ground_friction: u32,
    /// Momentum gained per chain jump
    pub chain_momentum_gain: u32,
    /// Momentum at or above which contact kills enemies
    pub kill_speed_threshold: u32,
    /// Jump impulse for a fresh jump
    pub base_jump_velocity: f32,
    /// Jump impulse for a bunny-hop chain jump
    pub chain_jump_velocity: f32,
    /// Gravity while not fast-falling
    pub gravity_y: f32,
    /// Gravity while holding down in the air
    pub fast_fall_gravity_y: f32,
    /// While invulnerable, input only applies below this horizontal speed
    pub invulnerable_input_max_speed: f32,

    // === Timers (milliseconds) ===
    pub landing_grace_ms: f64,
    pub flicker_step_ms: f64,
    pub flicker_steps: u8,
    pub restart_delay_ms: f64,
    pub enemy_flash_ms: f64,

    // === Combat ===
    /// Player must be this far above an enemy's center to pogo/pass through
    pub above_margin: f32,
    pub pogo_xp: u64,
    pub speed_kill_xp: u64,
    pub pogo_launch_velocity: f32,
    pub stomp_bounce_velocity: f32,
    pub knockback_velocity_x: f32,
    pub knockback_velocity_y: f32,
    pub kill_particles: u32,

    // === Lives ===
    pub starting_lives: u8,
    pub death_plane_y: f32,
    pub respawn_y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,

    // === World ===
    pub chunk_size: f32,
    /// Terrain must exist this far ahead of the player
    pub generation_lookahead: f32,
    /// Left edge of the safe starting chunk
    pub first_chunk_x: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// World units per displayed metre
    pub distance_unit: f32,

    // === Audio mix ===
    /// Momentum at which the melodic layer is fully faded in
    pub crossfade_full_momentum: f32,
    /// Volume of a fully faded-in music layer
    pub layer_volume: f32,
    pub fail_volume: f32,
    pub note_volume: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 300.0,
            max_momentum: 1200,
            ground_friction: 2,
            chain_momentum_gain: 150,
            kill_speed_threshold: 350,
            base_jump_velocity: -700.0,
            chain_jump_velocity: -1000.0,
            gravity_y: 1500.0,
            fast_fall_gravity_y: 4000.0,
            invulnerable_input_max_speed: 50.0,

            landing_grace_ms: 300.0,
            flicker_step_ms: 100.0,
            flicker_steps: 6,
            restart_delay_ms: 1000.0,
            enemy_flash_ms: 100.0,

            above_margin: 30.0,
            pogo_xp: 300,
            speed_kill_xp: 100,
            pogo_launch_velocity: -800.0,
            stomp_bounce_velocity: -900.0,
            knockback_velocity_x: -300.0,
            knockback_velocity_y: -400.0,
            kill_particles: 20,

            starting_lives: 3,
            death_plane_y: 800.0,
            respawn_y: 400.0,
            spawn_x: 100.0,
            spawn_y: 400.0,

            chunk_size: 1200.0,
            generation_lookahead: 800.0,
            first_chunk_x: 200.0,
            world_width: 1_000_000.0,
            world_height: 800.0,
            distance_unit: 100.0,

            crossfade_full_momentum: 800.0,
            layer_volume: 0.2,
            fail_volume: 0.2,
            note_volume: 1.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the defaults as a template)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot honor
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        };

        if self.max_momentum == 0 {
            return invalid("max_momentum", "must be positive");
        }
        if self.kill_speed_threshold > self.max_momentum {
            return invalid("kill_speed_threshold", "must not exceed max_momentum");
        }
        if self.chunk_size <= 0.0 {
            return invalid("chunk_size", "must be positive");
        }
        if self.generation_lookahead < 0.0 {
            return invalid("generation_lookahead", "must not be negative");
        }
        if self.crossfade_full_momentum <= 0.0 {
            return invalid("crossfade_full_momentum", "must be positive");
        }
        if self.starting_lives == 0 || self.starting_lives > MAX_LIVES {
            return invalid("starting_lives", "must be between 1 and 3");
        }
        if self.flicker_steps == 0 {
            return invalid("flicker_steps", "must be positive");
        }
        if self.landing_grace_ms <= 0.0
            || self.flicker_step_ms <= 0.0
            || self.restart_delay_ms <= 0.0
            || self.enemy_flash_ms <= 0.0
        {
            return invalid("timers", "durations must be positive");
        }
        if self.distance_unit <= 0.0 {
            return invalid("distance_unit", "must be positive");
        }
        Ok(())
    }

    /// Total length of the post-damage invulnerability window
    pub fn invulnerability_ms(&self) -> f64 {
        self.flicker_step_ms * f64::from(self.flicker_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert!((Tuning::default().invulnerability_ms() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_momentum": 2000, "base_speed": 250.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.max_momentum, 2000);
        assert_eq!(tuning.kill_speed_threshold, 350);
        assert_eq!(tuning.chunk_size, Tuning::default().chunk_size);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "starting_lives": 5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "starting_lives",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "max_momentum": 100 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "kill_speed_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse tuning JSON"));
    }

    #[test]
    fn test_json_round_trip() {
        let json = Tuning::default().to_json().expect("serializable");
        assert_eq!(Tuning::from_json(&json).expect("valid"), Tuning::default());
    }
}
