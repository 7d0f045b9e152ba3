//! Procedural world generation.
//!
//! Three algorithms populate a `TileGrid` in place: a trivial floor fill,
//! organic overworld terrain, and a room-and-corridor dungeon. All of them
//! draw from a caller-supplied RNG so a seeded `StdRng` makes generation
//! fully reproducible; there is no hidden global random state.

mod dungeon;
mod terrain;

pub use dungeon::{generate_dungeon, DungeonParams, Room};
pub use terrain::{generate_empty, generate_terrain};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// RNG for generation: seeded when reproducibility matters, entropy-backed
/// otherwise.
pub fn generation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
