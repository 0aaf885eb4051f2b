//! Property-based tests for the gameplay core.
//!
//! These check invariants that must hold for any input sequence or seed.
//! Run with: cargo test --release prop_sim

#![allow(clippy::unwrap_used)]

use glam::Vec2;
use proptest::prelude::*;

use momentum_runner::Tuning;
use momentum_runner::consts::SIM_DT;
use momentum_runner::sim::{
    BIOMES, BodyFeedback, GameState, MELODY, Player, TickInput, biome_index_for,
    crossfade_volumes, note_for_combo, on_land, take_damage, tick,
};

/// One thing that can happen to the player between ticks
#[derive(Debug, Clone, Copy)]
enum Op {
    Land,
    Jump { grounded: bool },
    Friction { grounded: bool },
    Grace,
    SpeedKill,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Land),
        any::<bool>().prop_map(|grounded| Op::Jump { grounded }),
        any::<bool>().prop_map(|grounded| Op::Friction { grounded }),
        Just(Op::Grace),
        Just(Op::SpeedKill),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Momentum stays within 0..=max whatever the player does
    #[test]
    fn prop_momentum_bounded(ops in prop::collection::vec(op(), 0..200)) {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        for op in ops {
            match op {
                Op::Land => {
                    player.grounded = true;
                    player.begin_landing();
                }
                Op::Jump { grounded } => {
                    player.on_jump(grounded, &tuning);
                    player.grounded = false;
                }
                Op::Friction { grounded } => player.apply_ground_friction(grounded, &tuning),
                Op::Grace => {
                    player.expire_landing_grace();
                }
                Op::SpeedKill => player.halve_momentum(),
            }
            prop_assert!(player.momentum <= tuning.max_momentum);
        }
    }

    /// Lives never exceed the cap and never underflow
    #[test]
    fn prop_lives_bounded(hits in 0usize..10, seed in any::<u64>()) {
        let mut state = GameState::new(seed);
        for _ in 0..hits {
            let before = state.player.lives;
            let applied = take_damage(&mut state);
            prop_assert_eq!(applied, before > 0);
            prop_assert!(state.player.lives <= 3);
        }
        prop_assert_eq!(state.player.lives as usize, 3usize.saturating_sub(hits));
    }

    /// The melody repeats every six combo steps
    #[test]
    fn prop_melody_periodic(combo in 0u32..1_000_000) {
        prop_assert_eq!(note_for_combo(combo), note_for_combo(combo + MELODY.len() as u32));
    }

    /// Layer volumes always sum to the layer volume and stay in range
    #[test]
    fn prop_crossfade_complementary(momentum in 0u32..5000) {
        let mix = crossfade_volumes(momentum, 800.0, 0.2);
        prop_assert!((0.0..=0.2).contains(&mix.melodic));
        prop_assert!((0.0..=0.2).contains(&mix.ambient));
        prop_assert!((mix.melodic + mix.ambient - 0.2).abs() < 1e-6);
    }

    /// Biome band advances every three chunks and cycles through the table
    #[test]
    fn prop_biome_formula(chunk in 0u32..10_000) {
        let start_x = chunk as f32 * 1200.0;
        let expected = (chunk as usize / 3) % BIOMES.len();
        prop_assert_eq!(biome_index_for(start_x, 1200.0), expected);
    }

    /// Chunks tile the x axis: contiguous, non-overlapping, append-only
    #[test]
    fn prop_chunks_contiguous(seed in any::<u64>(), run in 0u32..200) {
        let mut state = GameState::new(seed);
        let idle = TickInput::default();
        for step in 0..run {
            let feedback = BodyFeedback {
                pos: Vec2::new(100.0 + step as f32 * 250.0, 300.0),
                vel: Vec2::ZERO,
                grounded: false,
            };
            tick(&mut state, &idle, &feedback, SIM_DT);
        }
        let chunks = &state.terrain.chunks;
        for (i, pair) in chunks.windows(2).enumerate() {
            prop_assert_eq!(pair[1].start_x, pair[0].end_x());
            prop_assert_eq!(pair[1].index, i + 1);
        }
        prop_assert_eq!(chunks.last().map(|c| c.end_x()), Some(state.terrain.frontier));
        prop_assert!(chunks[0].safe_zone);
        prop_assert!(chunks[1..].iter().all(|c| !c.safe_zone));
    }

    /// The same seed lays out the same world
    #[test]
    fn prop_layout_deterministic(seed in any::<u64>()) {
        let mut a = GameState::new(seed);
        let mut b = GameState::new(seed);
        for _ in 0..8 {
            a.spawn_chunk(false);
            b.spawn_chunk(false);
        }
        let patterns = |s: &GameState| s.terrain.chunks.iter().map(|c| c.pattern).collect::<Vec<_>>();
        prop_assert_eq!(patterns(&a), patterns(&b));
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }

    /// Repeated landings while grounded never open more than one grace window
    #[test]
    fn prop_landing_edge_triggered(contacts in 1usize..20) {
        let mut state = GameState::new(1);
        let before = state.timers.pending_len();
        for _ in 0..contacts {
            on_land(&mut state);
        }
        prop_assert_eq!(state.timers.pending_len(), before + 1);
    }
}
