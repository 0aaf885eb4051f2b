//! Procedural terrain chunks
//!
//! The world is a strip of fixed-width chunks appended left to right as the
//! player advances. Each non-safe chunk is one of four hand-authored layouts,
//! picked by the injected RNG. Biomes are purely positional: three chunk
//! widths per biome, cycling through `BIOMES`.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

/// A color scheme shared by consecutive chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Biome {
    pub name: &'static str,
    pub platform_color: u32,
    pub background_color: u32,
}

/// Biome table, cycled by position
pub const BIOMES: [Biome; 4] = [
    Biome {
        name: "Forest",
        platform_color: 0x00ff00,
        background_color: 0x1a1a1a,
    },
    Biome {
        name: "Corruption",
        platform_color: 0x9370db,
        background_color: 0x2a002a,
    },
    Biome {
        name: "Hell",
        platform_color: 0xff4500,
        background_color: 0x330000,
    },
    Biome {
        name: "Ice",
        platform_color: 0x00ffff,
        background_color: 0x002233,
    },
];

/// Chunks sharing one biome before the table advances
pub const CHUNKS_PER_BIOME: f32 = 3.0;

/// Biome index for a chunk starting at `start_x`
pub fn biome_index_for(start_x: f32, chunk_size: f32) -> usize {
    let band = (start_x / (chunk_size * CHUNKS_PER_BIOME)).floor().max(0.0) as usize;
    band % BIOMES.len()
}

/// Layout patterns for non-safe chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pattern {
    /// Ground, two rising ledges, ground again
    StaggeredAscending,
    /// Short ground segments separated by pits
    GappedGround,
    /// One long floor patrolled by two enemies
    FlatGround,
    /// Small steps climbing up, then a landing strip
    ZigzagAscending,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::StaggeredAscending,
        Pattern::GappedGround,
        Pattern::FlatGround,
        Pattern::ZigzagAscending,
    ];

    /// Pattern for a draw in `0..4` (wraps out-of-range draws)
    pub fn from_draw(draw: u32) -> Self {
        Self::ALL[draw as usize % Self::ALL.len()]
    }

    /// Platforms as (x offset, y, width) and enemies as (x offset, y)
    fn layout(self) -> (&'static [(f32, f32, f32)], &'static [(f32, f32)]) {
        match self {
            Pattern::StaggeredAscending => (STAGGERED_PLATFORMS, STAGGERED_ENEMIES),
            Pattern::GappedGround => (GAPPED_PLATFORMS, GAPPED_ENEMIES),
            Pattern::FlatGround => (FLAT_PLATFORMS, FLAT_ENEMIES),
            Pattern::ZigzagAscending => (ZIGZAG_PLATFORMS, ZIGZAG_ENEMIES),
        }
    }
}

const STAGGERED_PLATFORMS: &[(f32, f32, f32)] = &[
    (0.0, 550.0, 300.0),
    (400.0, 450.0, 200.0),
    (700.0, 350.0, 200.0),
    (1000.0, 550.0, 200.0),
];
const STAGGERED_ENEMIES: &[(f32, f32)] = &[(450.0, 400.0), (1050.0, 500.0)];

const GAPPED_PLATFORMS: &[(f32, f32, f32)] = &[
    (0.0, 550.0, 200.0),
    (300.0, 550.0, 200.0),
    (700.0, 550.0, 200.0),
    (1100.0, 500.0, 100.0),
];
const GAPPED_ENEMIES: &[(f32, f32)] = &[(350.0, 500.0), (750.0, 500.0)];

const FLAT_PLATFORMS: &[(f32, f32, f32)] = &[(0.0, 550.0, 1200.0)];
const FLAT_ENEMIES: &[(f32, f32)] = &[(400.0, 500.0), (800.0, 500.0)];

const ZIGZAG_PLATFORMS: &[(f32, f32, f32)] = &[
    (0.0, 550.0, 200.0),
    (300.0, 400.0, 100.0),
    (500.0, 300.0, 100.0),
    (700.0, 200.0, 100.0),
    (900.0, 550.0, 300.0),
];
const ZIGZAG_ENEMIES: &[(f32, f32)] = &[(300.0, 350.0), (1000.0, 500.0)];

/// Ground level of the safe starting floor
pub const SAFE_FLOOR_Y: f32 = 550.0;

/// A static platform; `center` matches the engine's centered rectangles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Platform {
    pub center: Vec2,
    pub width: f32,
    pub color: u32,
}

/// A fixed-width slice of the world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// Position in generation order (0 = leftmost)
    pub index: usize,
    pub start_x: f32,
    pub width: f32,
    pub biome_index: usize,
    pub safe_zone: bool,
    /// `None` for safe zones
    pub pattern: Option<Pattern>,
    pub platforms: Vec<Platform>,
    /// Enemy spawn points
    pub enemies: Vec<Vec2>,
}

impl Chunk {
    pub fn end_x(&self) -> f32 {
        self.start_x + self.width
    }

    pub fn biome(&self) -> &'static Biome {
        &BIOMES[self.biome_index]
    }
}

/// Generate a chunk, drawing the layout pattern from `rng`
///
/// Safe zones draw nothing, so the RNG stream only advances for real chunks.
pub fn generate_chunk<R: Rng + ?Sized>(
    index: usize,
    start_x: f32,
    safe_zone: bool,
    chunk_size: f32,
    rng: &mut R,
) -> Chunk {
    if safe_zone {
        return build_chunk(index, start_x, chunk_size, None);
    }
    let pattern = Pattern::from_draw(rng.random_range(0..4));
    build_chunk(index, start_x, chunk_size, Some(pattern))
}

/// Lay out a chunk with a known pattern (`None` = safe zone)
pub fn build_chunk(index: usize, start_x: f32, chunk_size: f32, pattern: Option<Pattern>) -> Chunk {
    let biome_index = biome_index_for(start_x, chunk_size);
    let color = BIOMES[biome_index].platform_color;

    let (platforms, enemies) = match pattern {
        None => (
            vec![Platform {
                center: Vec2::new(start_x, SAFE_FLOOR_Y),
                width: chunk_size,
                color,
            }],
            Vec::new(),
        ),
        Some(pattern) => {
            let (plats, foes) = pattern.layout();
            let platforms = plats
                .iter()
                .map(|&(x, y, width)| Platform {
                    center: Vec2::new(start_x + x, y),
                    width,
                    color,
                })
                .collect();
            let enemies = foes.iter().map(|&(x, y)| Vec2::new(start_x + x, y)).collect();
            (platforms, enemies)
        }
    };

    Chunk {
        index,
        start_x,
        width: chunk_size,
        biome_index,
        safe_zone: pattern.is_none(),
        pattern,
        platforms,
        enemies,
    }
}

/// Append-only strip of generated chunks
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    pub chunks: Vec<Chunk>,
    /// x beyond which no terrain exists yet
    pub frontier: f32,
}

impl Terrain {
    /// Empty terrain whose first chunk will start at `start_x`
    pub fn starting_at(start_x: f32) -> Self {
        Self {
            chunks: Vec::new(),
            frontier: start_x,
        }
    }

    /// True when the player is close enough to the frontier to need more world
    pub fn needs_chunk(&self, player_x: f32, lookahead: f32) -> bool {
        player_x > self.frontier - lookahead
    }

    /// Append a chunk generated at the frontier and advance the frontier
    pub fn push(&mut self, chunk: Chunk) -> &Chunk {
        debug_assert!(chunk.start_x >= self.frontier - f32::EPSILON);
        self.frontier = chunk.end_x();
        self.chunks.push(chunk);
        &self.chunks[self.chunks.len() - 1]
    }

    /// Index the next chunk will get
    pub fn next_index(&self) -> usize {
        self.chunks.len()
    }
}
