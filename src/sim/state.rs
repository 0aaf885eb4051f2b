//! Game state and core simulation types
//!
//! Everything the gameplay rules touch lives in `GameState`; the engine owns
//! bodies and mirrors their kinematics in through `tick` and the collision
//! callbacks, and reads intents back out of the event queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::chunk::{Chunk, Terrain, generate_chunk};
use super::mix::{Crossfade, SoundCue};
use super::timers::Scheduler;
use crate::consts::*;
use crate::tuning::Tuning;

/// Player gameplay state
///
/// `pos`, `vel` and `grounded` are mirrored from the engine; the rules only
/// write `vel` for knockback the engine has not applied yet. Everything else
/// is owned by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    /// Speed bonus from chained hops, 0..=max_momentum
    pub momentum: u32,
    pub bunny_hopping: bool,
    /// Fast-fall gravity currently applied
    pub fast_falling: bool,
    pub combo: u32,
    pub lives: u8,
    pub invulnerable: bool,
    /// Knockback velocity set this frame, not yet seen by the engine
    pub knockback_pending: bool,
    pub total_xp: u64,
    /// Bumped per damage so an older flicker sequence cannot end a newer one
    pub flicker_generation: u32,
    /// Last fill color sent to the engine
    pub fill: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.spawn_x, tuning.spawn_y),
            vel: Vec2::ZERO,
            grounded: false,
            momentum: 0,
            bunny_hopping: false,
            fast_falling: false,
            combo: 0,
            lives: tuning.starting_lives.min(MAX_LIVES),
            invulnerable: false,
            knockback_pending: false,
            total_xp: 0,
            flicker_generation: 0,
            fill: PLAYER_IDLE_COLOR,
        }
    }
}

/// An enemy spawned by a chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
    pub chunk_index: usize,
}

/// Velocity and visual commands for the player body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BodyCommand {
    SetVelocityX(f32),
    SetVelocityY(f32),
    SetVelocity(Vec2),
    SetPosition(Vec2),
    SetGravityY(f32),
    SetScale(Vec2),
    SetFill(u32),
    SetAlpha(f32),
}

/// Outbound events for the engine, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Body(BodyCommand),
    /// World and camera bounds
    WorldBounds { width: f32, height: f32 },
    /// `GameState::terrain.chunks[index]` is new and needs bodies
    ChunkSpawned { index: usize },
    /// Enemy `id` was created at `pos`
    EnemySpawned { id: u32, pos: Vec2 },
    BackgroundChanged { color: u32 },
    EnemyDestroyed { id: u32 },
    EnemyFill { id: u32, color: u32 },
    ParticleBurst { pos: Vec2, count: u32 },
    CameraShake { duration_ms: f64, intensity: f32 },
    Sound(SoundCue),
    /// Looping music layer volumes for this frame
    LayerVolumes(Crossfade),
    FloatingText { pos: Vec2, text: String, color: u32 },
    /// Everything was reset; the engine should rebuild the scene
    SceneRestarted,
}

/// Values for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Hud {
    pub speed: u32,
    pub distance_m: u32,
    pub xp: u64,
    pub combo: u32,
    /// Combo worth highlighting (more than 3)
    pub combo_hot: bool,
    pub lives: u8,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance parameters
    pub tuning: Tuning,
    /// Pattern source for chunk generation
    pub rng: Pcg32,
    pub player: Player,
    /// All enemies ever spawned this episode (sorted by id)
    pub enemies: Vec<Enemy>,
    pub terrain: Terrain,
    /// Deferred effects on the game clock
    pub timers: Scheduler,
    pub hud: Hud,
    /// Music layer volumes from the last tick
    pub crossfade: Crossfade,
    /// Simulation tick counter (this episode)
    pub time_ticks: u64,
    /// Episodes started so far (1 after `new`)
    pub episode: u32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game and lay out the first episode
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            player: Player::new(&tuning),
            terrain: Terrain::starting_at(tuning.first_chunk_x),
            crossfade: Crossfade {
                melodic: 0.0,
                ambient: tuning.layer_volume,
            },
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            enemies: Vec::new(),
            timers: Scheduler::new(),
            hud: Hud::default(),
            time_ticks: 0,
            episode: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.start_episode();
        state
    }

    /// Lay out the starting world: a safe chunk, one random chunk
    pub(crate) fn start_episode(&mut self) {
        self.episode += 1;
        log::info!("Episode {} starting (seed {})", self.episode, self.seed);

        self.emit(GameEvent::WorldBounds {
            width: self.tuning.world_width,
            height: self.tuning.world_height,
        });
        self.body(BodyCommand::SetPosition(self.player.pos));
        self.body(BodyCommand::SetVelocity(Vec2::ZERO));
        self.body(BodyCommand::SetFill(self.player.fill));
        self.body(BodyCommand::SetAlpha(1.0));

        self.spawn_chunk(true);
        self.spawn_chunk(false);
        self.refresh_hud();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Generate the next chunk at the frontier and spawn its enemies
    pub fn spawn_chunk(&mut self, safe_zone: bool) -> &Chunk {
        let index = self.terrain.next_index();
        let chunk = generate_chunk(
            index,
            self.terrain.frontier,
            safe_zone,
            self.tuning.chunk_size,
            &mut self.rng,
        );
        log::info!(
            "Chunk {} at x={} ({}, {:?})",
            index,
            chunk.start_x,
            chunk.biome().name,
            chunk.pattern
        );

        for &pos in &chunk.enemies {
            let id = self.next_entity_id();
            self.enemies.push(Enemy {
                id,
                pos,
                active: true,
                chunk_index: index,
            });
            self.emit(GameEvent::EnemySpawned { id, pos });
        }
        self.emit(GameEvent::BackgroundChanged {
            color: chunk.biome().background_color,
        });
        self.emit(GameEvent::ChunkSpawned { index });
        self.terrain.push(chunk)
    }

    /// Look up an enemy by ID
    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.enemies[i])
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(move |i| &mut self.enemies[i])
    }

    /// Number of enemies still alive
    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    /// Queue an event for the engine
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a player body command
    pub fn body(&mut self, command: BodyCommand) {
        self.events.push(GameEvent::Body(command));
    }

    /// Change the player fill, skipping redundant commands
    pub fn set_fill(&mut self, color: u32) {
        if self.player.fill != color {
            self.player.fill = color;
            self.body(BodyCommand::SetFill(color));
        }
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recompute HUD values from the player
    pub fn refresh_hud(&mut self) {
        let distance = (self.player.pos.x / self.tuning.distance_unit).floor().max(0.0);
        self.hud = Hud {
            speed: self.player.momentum,
            distance_m: distance as u32,
            xp: self.player.total_xp,
            combo: self.player.combo,
            combo_hot: self.player.combo > 3,
            lives: self.player.lives,
        };
    }
}
