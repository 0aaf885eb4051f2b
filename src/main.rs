//! Momentum Runner - headless demo
//!
//! Drives the gameplay core with a scripted bunny-hopping player against a
//! tiny kinematic stand-in for the physics engine, and logs the HUD.
//!
//! Usage: `momentum-runner [--tuning <PATH>] [--seed <N>] [--seconds <S>]`

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use momentum_runner::consts::*;
use momentum_runner::sim::{
    BodyCommand, BodyFeedback, ContactFaces, EnemyContact, FixedStep, GameEvent, GameState,
    TickInput, on_enemy_contact, on_enemy_prefilter, on_land, tick,
};
use momentum_runner::{AudioMixer, LayerGains, Settings, Tuning};

/// Momentum Runner - headless demo of the gameplay core
#[derive(Parser, Debug)]
#[command(name = "momentum-runner")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tuning JSON file (default: built-in balance)
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Run seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Simulated play time in seconds
    #[arg(long, default_value = "20")]
    seconds: f32,
}

const FRAME_DT: f32 = 1.0 / 60.0;
const HALF_PLAYER: f32 = PLAYER_SIZE / 2.0;
const HALF_ENEMY: f32 = ENEMY_SIZE / 2.0;

/// Just enough kinematics to exercise the core: one AABB player,
/// one-way platforms, overlap tests against enemies
struct StandIn {
    pos: Vec2,
    vel: Vec2,
    gravity_y: f32,
    grounded: bool,
    /// (center, width)
    platforms: Vec<(Vec2, f32)>,
    enemies: BTreeMap<u32, Vec2>,
    /// Music layer gains after the mixer
    music: LayerGains,
}

impl StandIn {
    fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.spawn_x, tuning.spawn_y),
            vel: Vec2::ZERO,
            gravity_y: tuning.gravity_y,
            grounded: false,
            platforms: Vec::new(),
            enemies: BTreeMap::new(),
            music: LayerGains {
                melodic: 0.0,
                ambient: 0.0,
            },
        }
    }

    fn feedback(&self) -> BodyFeedback {
        BodyFeedback {
            pos: self.pos,
            vel: self.vel,
            grounded: self.grounded,
        }
    }

    /// Integrate one step; returns true on touchdown
    fn step(&mut self, dt: f32) -> bool {
        let prev_bottom = self.pos.y + HALF_PLAYER;
        self.vel.y += self.gravity_y * dt;
        self.pos += self.vel * dt;

        let was_grounded = self.grounded;
        self.grounded = false;
        if self.vel.y < 0.0 {
            return false;
        }
        let bottom = self.pos.y + HALF_PLAYER;
        for &(center, width) in &self.platforms {
            let top = center.y - PLATFORM_THICKNESS / 2.0;
            let within = (self.pos.x - center.x).abs() <= width / 2.0 + HALF_PLAYER;
            if within && prev_bottom <= top + 0.5 && bottom >= top {
                self.pos.y = top - HALF_PLAYER;
                self.vel.y = 0.0;
                self.grounded = true;
                break;
            }
        }
        self.grounded && !was_grounded
    }

    /// Enemies currently overlapping the player
    fn overlaps(&self) -> Vec<(u32, Vec2)> {
        let reach = HALF_PLAYER + HALF_ENEMY;
        self.enemies
            .iter()
            .filter(|(_, pos)| {
                (self.pos.x - pos.x).abs() < reach && (self.pos.y - pos.y).abs() < reach
            })
            .map(|(&id, &pos)| (id, pos))
            .collect()
    }

    /// Physical response for a contact the core let through
    fn separate(&mut self, enemy_pos: Vec2) -> ContactFaces {
        let reach = HALF_PLAYER + HALF_ENEMY;
        let from_above = self.pos.y < enemy_pos.y - HALF_ENEMY && self.vel.y >= 0.0;
        if from_above {
            self.pos.y = enemy_pos.y - reach;
            self.vel.y = 0.0;
        } else if self.pos.x < enemy_pos.x {
            self.pos.x = enemy_pos.x - reach;
        } else {
            self.pos.x = enemy_pos.x + reach;
        }
        ContactFaces {
            enemy_up: from_above,
            player_down: from_above,
        }
    }

    fn apply(&mut self, state: &GameState, event: &GameEvent) {
        match event {
            GameEvent::Body(command) => match *command {
                BodyCommand::SetVelocityX(vx) => self.vel.x = vx,
                BodyCommand::SetVelocityY(vy) => self.vel.y = vy,
                BodyCommand::SetVelocity(vel) => self.vel = vel,
                BodyCommand::SetPosition(pos) => self.pos = pos,
                BodyCommand::SetGravityY(g) => self.gravity_y = g,
                BodyCommand::SetScale(_) | BodyCommand::SetFill(_) | BodyCommand::SetAlpha(_) => {}
            },
            GameEvent::ChunkSpawned { index } => {
                if let Some(chunk) = state.terrain.chunks.get(*index) {
                    self.platforms
                        .extend(chunk.platforms.iter().map(|p| (p.center, p.width)));
                }
            }
            GameEvent::EnemySpawned { id, pos } => {
                self.enemies.insert(*id, *pos);
            }
            GameEvent::EnemyDestroyed { id } => {
                self.enemies.remove(id);
            }
            GameEvent::SceneRestarted => {
                self.platforms.clear();
                self.enemies.clear();
                self.grounded = false;
                self.gravity_y = state.tuning.gravity_y;
            }
            _ => {}
        }
    }
}

/// Scripted player: run right, hop on every landing, pogo enemies below
fn scripted_input(world: &StandIn) -> TickInput {
    let enemy_below = world.enemies.values().any(|pos| {
        let dx = pos.x - world.pos.x;
        (0.0..120.0).contains(&dx) && pos.y > world.pos.y
    });
    TickInput {
        left: false,
        right: true,
        down: !world.grounded && enemy_below,
        jump_pressed: world.grounded,
    }
}

fn flush_events(
    state: &mut GameState,
    world: &mut StandIn,
    mixer: &AudioMixer,
    settings: &Settings,
) {
    let events = state.drain_events();
    for request in mixer.requests_for(&events) {
        log::trace!(
            "play {} ({:+} cents) at {:.2}",
            request.key,
            request.detune_cents,
            request.volume
        );
    }
    for event in events.iter().filter(|e| settings.allows(e)) {
        match event {
            GameEvent::FloatingText { text, .. } => log::info!("{text}"),
            GameEvent::LayerVolumes(mix) => world.music = mixer.layer_gains(*mix),
            _ => {}
        }
        world.apply(state, event);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => {
            log::info!("Loading tuning from {}", path.display());
            Tuning::from_json(&std::fs::read_to_string(path)?)?
        }
        None => Tuning::default(),
    };
    let seed = args.seed;
    let seconds = args.seconds;

    log::info!("Momentum Runner (headless) starting with seed {seed}");
    let settings = Settings::default();
    let mixer = AudioMixer::from_settings(&settings);
    let mut world = StandIn::new(&tuning);
    let mut state = GameState::with_tuning(seed, tuning);
    flush_events(&mut state, &mut world, &mixer, &settings);

    let mut stepper = FixedStep::new();
    let frames = (seconds / FRAME_DT).ceil() as u32;
    let mut last_report = 0;
    for frame in 0..frames {
        for _ in 0..stepper.steps(FRAME_DT) {
            let input = scripted_input(&world);

            if world.step(SIM_DT) {
                on_land(&mut state);
            }
            for (id, enemy_pos) in world.overlaps() {
                let contact = EnemyContact {
                    enemy_id: id,
                    player_pos: world.pos,
                    player_vel: world.vel,
                    enemy_pos,
                    pogo: input.down,
                };
                if on_enemy_prefilter(&mut state, &contact) {
                    let faces = world.separate(enemy_pos);
                    on_enemy_contact(&mut state, id, faces);
                }
            }
            flush_events(&mut state, &mut world, &mixer, &settings);

            tick(&mut state, &input, &world.feedback(), SIM_DT);
            flush_events(&mut state, &mut world, &mixer, &settings);
        }

        let second = frame / 60;
        if second != last_report {
            last_report = second;
            log::info!(
                "hud {} music {:.3}/{:.3}",
                serde_json::to_string(&state.hud)?,
                world.music.melodic,
                world.music.ambient
            );
        }
    }

    log::info!(
        "Done after {} episode(s): {}",
        state.episode,
        serde_json::to_string(&state.hud)?
    );
    Ok(())
}
