//! Whole-episode tests through the public API: the engine side is played by
//! hand-written feedback and callbacks.

use glam::Vec2;

use momentum_runner::consts::*;
use momentum_runner::sim::{
    BodyCommand, BodyFeedback, ContactFaces, EnemyContact, GameEvent, GameState, LifePhase,
    Player, TickInput, on_enemy_contact, on_enemy_prefilter, on_land, tick,
};
use momentum_runner::{AudioMixer, Settings, Tuning};

fn grounded(x: f32) -> BodyFeedback {
    BodyFeedback {
        pos: Vec2::new(x, 518.0),
        vel: Vec2::ZERO,
        grounded: true,
    }
}

fn falling(x: f32) -> BodyFeedback {
    BodyFeedback {
        pos: Vec2::new(x, 850.0),
        vel: Vec2::new(0.0, 500.0),
        grounded: false,
    }
}

fn run(state: &mut GameState, input: &TickInput, feedback: &BodyFeedback, ticks: u32) {
    for _ in 0..ticks {
        tick(state, input, feedback, SIM_DT);
    }
}

/// Land then jump on the next tick, `hops` times
fn bunny_hop(state: &mut GameState, x: f32, hops: u32) {
    let jump = TickInput {
        right: true,
        jump_pressed: true,
        ..Default::default()
    };
    for _ in 0..hops {
        let airborne = BodyFeedback {
            pos: Vec2::new(x, 500.0),
            vel: Vec2::new(0.0, 300.0),
            grounded: false,
        };
        tick(state, &TickInput::default(), &airborne, SIM_DT);
        on_land(state);
        tick(state, &jump, &grounded(x), SIM_DT);
    }
}

#[test]
fn test_bunny_hop_builds_momentum_and_lethality() {
    let mut state = GameState::new(11);
    bunny_hop(&mut state, 300.0, 3);
    // Ground friction bites on each jump tick
    assert_eq!(state.player.momentum, 446);
    assert_eq!(state.player.combo, 3);
    assert_eq!(state.hud.speed, 446);
    assert!(state.player.is_lethal(&state.tuning));
    assert!(state.crossfade.melodic > 0.05);
}

#[test]
fn test_lethal_run_kills_on_contact() {
    let mut state = GameState::new(11);
    bunny_hop(&mut state, 300.0, 3);
    let enemy = state.enemies[0].clone();
    let contact = EnemyContact {
        enemy_id: enemy.id,
        player_pos: enemy.pos - Vec2::new(30.0, 0.0),
        player_vel: Vec2::new(750.0, 0.0),
        enemy_pos: enemy.pos,
        pogo: false,
    };
    assert!(!on_enemy_prefilter(&mut state, &contact));
    assert_eq!(state.player.total_xp, 100);
    assert_eq!(state.player.momentum, 223);
    assert_eq!(state.active_enemies(), 1);
    let texts: Vec<_> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::FloatingText { text, color, .. } => Some((text, color)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![("+100 XP".to_string(), XP_TEXT_COLOR)]);
}

#[test]
fn test_slow_side_contact_hurts_once() {
    let mut state = GameState::new(5);
    let enemy = state.enemies[0].clone();
    let contact = EnemyContact {
        enemy_id: enemy.id,
        player_pos: enemy.pos - Vec2::new(36.0, 0.0),
        player_vel: Vec2::new(300.0, 0.0),
        enemy_pos: enemy.pos,
        pogo: false,
    };
    for _ in 0..5 {
        if on_enemy_prefilter(&mut state, &contact) {
            on_enemy_contact(&mut state, enemy.id, ContactFaces::default());
        }
    }
    assert_eq!(state.player.lives, 2);
    assert_eq!(state.player.life_phase(), LifePhase::Invulnerable);

    // Flicker runs out after 600ms of game time
    run(&mut state, &TickInput::default(), &grounded(enemy.pos.x - 60.0), 73);
    assert_eq!(state.player.life_phase(), LifePhase::Alive);
    assert_eq!(state.player.fill, PLAYER_IDLE_COLOR);
}

#[test]
fn test_three_falls_restart_the_episode() {
    let mut state = GameState::new(99);
    let fresh = Player::new(&state.tuning);
    let initial_chunks: Vec<_> = state.terrain.chunks.iter().map(|c| c.start_x).collect();
    state.player.total_xp = 2500;
    state.drain_events();

    let idle = TickInput::default();
    tick(&mut state, &idle, &falling(500.0), SIM_DT);
    assert_eq!(state.player.lives, 2);
    tick(&mut state, &idle, &falling(500.0), SIM_DT);
    tick(&mut state, &idle, &falling(500.0), SIM_DT);
    assert_eq!(state.player.life_phase(), LifePhase::Dead);
    assert_eq!(state.hud.lives, 0);

    // Dead: no more damage, no respawn; restart after the delay
    let events = state.drain_events();
    let respawns = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Body(BodyCommand::SetPosition(_))))
        .count();
    assert_eq!(respawns, 2);

    for _ in 0..200 {
        tick(&mut state, &idle, &grounded(500.0), SIM_DT);
        if state.episode == 2 {
            break;
        }
    }
    assert_eq!(state.episode, 2);
    assert_eq!(state.player, fresh);
    assert_eq!(state.hud.xp, 0);
    assert_eq!(state.hud.lives, 3);
    let chunks: Vec<_> = state.terrain.chunks.iter().map(|c| c.start_x).collect();
    assert_eq!(chunks, initial_chunks);
    assert!(state.drain_events().contains(&GameEvent::SceneRestarted));
}

#[test]
fn test_custom_tuning_flows_through() {
    let tuning = Tuning::from_json(r#"{"starting_lives": 1, "chain_momentum_gain": 400}"#)
        .unwrap_or_default();
    assert_eq!(tuning.starting_lives, 1);
    let mut state = GameState::with_tuning(3, tuning);
    bunny_hop(&mut state, 300.0, 1);
    assert_eq!(state.player.momentum, 400);
    assert!(state.player.is_lethal(&state.tuning));
}

#[test]
fn test_events_reach_audio_and_settings() {
    let mut state = GameState::new(8);
    bunny_hop(&mut state, 300.0, 2);
    let events = state.drain_events();

    let mixer = AudioMixer::default();
    let requests = mixer.requests_for(&events);
    assert_eq!(requests.iter().map(|r| r.key).collect::<Vec<_>>(), ["note2", "note3"]);

    let settings = Settings {
        reduced_motion: true,
        ..Default::default()
    };
    assert!(events.iter().all(|e| settings.allows(e)));
}

#[test]
fn test_timers_from_a_lost_episode_never_fire() {
    let mut state = GameState::new(21);
    state.player.lives = 1;
    let enemy = state.enemies[0].clone();
    on_enemy_contact(&mut state, enemy.id, ContactFaces::default());
    assert_eq!(state.player.life_phase(), LifePhase::Dead);

    let airborne = BodyFeedback {
        pos: Vec2::new(300.0, 300.0),
        vel: Vec2::ZERO,
        grounded: false,
    };
    let idle = TickInput::default();

    // ~900ms into the restart delay: land (grace would end at ~1200ms)
    run(&mut state, &idle, &airborne, 108);
    on_land(&mut state);
    assert!(state.player.bunny_hopping);

    // ~950ms: stomp an enemy (flash would end at ~1050ms)
    run(&mut state, &idle, &grounded(300.0), 6);
    let stomp = ContactFaces {
        enemy_up: true,
        player_down: true,
    };
    assert!(on_enemy_contact(&mut state, enemy.id, stomp).is_some());

    for _ in 0..20 {
        tick(&mut state, &idle, &grounded(300.0), SIM_DT);
        if state.episode == 2 {
            break;
        }
    }
    assert_eq!(state.episode, 2);
    assert_eq!(state.timers.pending_len(), 0);
    state.drain_events();

    // Land in the new episode; its window closes at ~1308ms, after the old one
    tick(&mut state, &idle, &airborne, SIM_DT);
    on_land(&mut state);
    run(&mut state, &idle, &grounded(300.0), 29);
    assert!(state.player.bunny_hopping);
    assert_eq!(state.player.fill, PLAYER_LANDED_COLOR);
    assert!(
        !state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyFill { .. }))
    );

    run(&mut state, &idle, &grounded(300.0), 8);
    assert!(!state.player.bunny_hopping);
}
