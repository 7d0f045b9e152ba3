//! GridQuest Core - Tile-World Adventure Engine
//!
//! An ECS-based spatial engine for tile-grid adventure games: procedural
//! world generation, pathfinding, field of view, collision, physics, and
//! enemy behavior over a shared tile grid.
//!
//! # Architecture
//!
//! Entities live in a `hecs` world and carry plain-data components; the
//! systems module drives behavior each tick. Spatial queries (A*, FOV,
//! AABB, integration) sit behind the [`backend::EngineCore`] trait so a
//! faster backend can replace the reference implementation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`grid`] | Tile grid, per-cell properties, regions, walkability |
//! | [`generation`] | Procedural terrain and room-and-corridor dungeons |
//! | [`nav`] | A* pathfinding with Manhattan heuristic |
//! | [`fov`] | Ray-cast field of view |
//! | [`physics`] | AABB overlap, movement validation, Euler integration |
//! | [`backend`] | Pluggable engine core trait and reference backend |
//! | [`components`] | Plain-data entity components |
//! | [`systems`] | Enemy behavior controller |
//! | [`persistence`] | JSON world files with generation fallback |
//! | [`engine`] | The `Simulation` that ties everything together |
//!
//! # Example
//!
//! ```rust,no_run
//! use gridquest_core::prelude::*;
//! use gridquest_core::generation::{self, DungeonParams};
//!
//! let mut grid = TileGrid::new(64, 64, 8);
//! let mut rng = generation::generation_rng(Some(42));
//! let rooms = generation::generate_dungeon(&mut grid, &DungeonParams::default(), &mut rng);
//!
//! let mut sim = Simulation::new(grid);
//! let (cx, cy) = rooms[0].center();
//! sim.spawn_player((cx * 8) as f32, (cy * 8) as f32);
//!
//! loop {
//!     sim.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod backend;
pub mod components;
pub mod engine;
pub mod fov;
pub mod generation;
pub mod grid;
pub mod nav;
pub mod persistence;
pub mod physics;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::backend::{EngineCore, ReferenceCore};
    pub use crate::components::*;
    pub use crate::engine::Simulation;
    pub use crate::grid::{Tile, TileGrid};
    pub use crate::physics::PhysicsConfig;
}
