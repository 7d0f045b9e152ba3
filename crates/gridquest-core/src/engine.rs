//! Simulation engine - main entry point for running a world.
//!
//! `Simulation` owns the tile grid and the ECS world and advances both:
//! enemy behavior first, then the physics integrator for every entity
//! carrying a velocity. The hot-path operations route through a pluggable
//! [`EngineCore`] backend.

use hecs::{Entity, World};

use crate::backend::{EngineCore, ReferenceCore};
use crate::components::{Body, Enemy, Health, Player, Position, Velocity};
use crate::fov::VisibilityGrid;
use crate::grid::TileGrid;
use crate::nav;
use crate::persistence::{self, WorldFileError};
use crate::physics::PhysicsConfig;
use crate::systems::enemy_ai_system;

/// The running game world: grid, entities, physics, and a tick counter.
pub struct Simulation {
    /// The world's tile data.
    pub grid: TileGrid,
    /// ECS world containing all entities.
    pub entities: World,
    /// Integrator tuning.
    pub physics: PhysicsConfig,
    core: Box<dyn EngineCore>,
    tick: u64,
}

impl Simulation {
    /// Create a simulation over an existing grid with the reference backend.
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            entities: World::new(),
            physics: PhysicsConfig::default(),
            core: Box::new(ReferenceCore),
            tick: 0,
        }
    }

    /// Swap in a different engine backend.
    pub fn with_core(mut self, core: Box<dyn EngineCore>) -> Self {
        self.core = core;
        self
    }

    /// Spawn the player at a world position.
    pub fn spawn_player(&mut self, x: f32, y: f32) -> Entity {
        let size = self.grid.tile_size() as f32;
        self.entities.spawn((
            Player,
            Position::new(x, y),
            Velocity::default(),
            Body::new(size, size),
            Health::new(100),
        ))
    }

    /// Spawn an enemy at a world position.
    pub fn spawn_enemy(&mut self, x: f32, y: f32, enemy: Enemy, health: i32) -> Entity {
        let size = self.grid.tile_size() as f32;
        self.entities.spawn((
            Position::new(x, y),
            Velocity::default(),
            Body::new(size, size),
            Health::new(health),
            enemy,
        ))
    }

    /// Advance the simulation by one tick of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.tick += 1;

        enemy_ai_system(&mut self.entities, &self.grid, self.tick);

        let core = self.core.as_ref();
        let physics = &self.physics;
        for (_entity, (pos, vel, body)) in self
            .entities
            .query_mut::<(&mut Position, &mut Velocity, &Body)>()
        {
            let ((px, py), (vx, vy)) =
                core.step(physics, (pos.x, pos.y), (vel.x, vel.y), body.on_ground, dt);
            pos.x = px;
            pos.y = py;
            vel.x = vx;
            vel.y = vy;
        }
    }

    /// The player entity, if one has been spawned.
    pub fn player(&self) -> Option<Entity> {
        self.entities
            .query::<&Player>()
            .iter()
            .map(|(entity, _)| entity)
            .next()
    }

    /// Field of view from the player's tile, or `None` without a player.
    /// Walls, trees, and rocks cut off sight lines.
    pub fn player_fov(&self, radius: u32) -> Option<VisibilityGrid> {
        let player = self.player()?;
        let pos = self.entities.get::<&Position>(player).ok()?;
        let origin = pos.tile(self.grid.tile_size());

        let grid = &self.grid;
        let obstacle = |x: i32, y: i32| grid.get_tile(x, y).blocks_sight();
        Some(self.core.compute_fov(
            origin,
            radius,
            grid.width(),
            grid.height(),
            &obstacle,
        ))
    }

    /// A* path between tiles, respecting the grid's walkability.
    pub fn find_path(&self, start: (i32, i32), goal: (i32, i32)) -> Vec<(i32, i32)> {
        let grid = &self.grid;
        let walkable = |x: i32, y: i32| grid.is_walkable_tile(x, y);
        self.core
            .find_path(start, goal, &walkable, nav::DEFAULT_MAX_EXPANSIONS)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn enemy_count(&self) -> usize {
        self.entities.query::<&Enemy>().iter().count()
    }

    /// Save the world grid to a writer.
    pub fn save_world<W: std::io::Write>(&self, writer: W) -> Result<(), WorldFileError> {
        persistence::save_world(writer, &self.grid)
    }

    /// Replace the world grid from a reader. Entities are left untouched.
    pub fn load_world<R: std::io::Read>(&mut self, reader: R) -> Result<(), WorldFileError> {
        self.grid = persistence::load_world(reader)?;
        Ok(())
    }
}
