//! Integration tests for the full world pipeline.
//!
//! Exercises: generation → walkability → pathfinding → persistence
//! → simulation, the way a game client would drive the engine.
//!
//! All tests are headless — no rendering, no input.

use gridquest_core::components::{Enemy, EnemyState, Position};
use gridquest_core::engine::Simulation;
use gridquest_core::generation::{self, DungeonParams};
use gridquest_core::grid::{Tile, TileGrid};
use gridquest_core::nav;
use gridquest_core::persistence::{load_world, save_world};
use gridquest_core::physics::PhysicsConfig;

// ── Helpers ────────────────────────────────────────────────────────────

fn dungeon_world(seed: u64) -> (TileGrid, Vec<generation::Room>) {
    let mut grid = TileGrid::new(64, 64, 8);
    grid.name = format!("dungeon-{}", seed);
    let mut rng = generation::generation_rng(Some(seed));
    let rooms = generation::generate_dungeon(&mut grid, &DungeonParams::default(), &mut rng);
    (grid, rooms)
}

fn count_tiles(grid: &TileGrid, tile: Tile) -> usize {
    let mut n = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get_tile(x, y) == tile {
                n += 1;
            }
        }
    }
    n
}

// ── Generation tests ───────────────────────────────────────────────────

#[test]
fn dungeon_rooms_are_mutually_reachable() {
    let (grid, rooms) = dungeon_world(7);
    assert!(rooms.len() >= 2, "seed should place at least two rooms");

    let start = rooms[0].center();
    for room in &rooms[1..] {
        let path = nav::find_path(
            start,
            room.center(),
            |x, y| grid.is_walkable_tile(x, y),
            50_000,
        );
        assert!(
            !path.is_empty(),
            "no path from {:?} to {:?}",
            start,
            room.center()
        );
    }
}

#[test]
fn generation_is_seed_deterministic() {
    let (grid_a, rooms_a) = dungeon_world(99);
    let (grid_b, rooms_b) = dungeon_world(99);
    assert_eq!(grid_a, grid_b);
    assert_eq!(rooms_a, rooms_b);

    let mut terrain_a = TileGrid::new(48, 48, 8);
    let mut terrain_b = TileGrid::new(48, 48, 8);
    generation::generate_terrain(&mut terrain_a, &mut generation::generation_rng(Some(5)));
    generation::generate_terrain(&mut terrain_b, &mut generation::generation_rng(Some(5)));
    assert_eq!(terrain_a, terrain_b);
}

#[test]
fn terrain_is_mostly_open() {
    let mut grid = TileGrid::new(64, 64, 8);
    generation::generate_terrain(&mut grid, &mut generation::generation_rng(Some(11)));

    let open = count_tiles(&grid, Tile::Grass) + count_tiles(&grid, Tile::Path);
    let total = (grid.width() * grid.height()) as usize;
    assert!(
        open * 2 > total,
        "terrain should be mostly walkable, got {}/{} open",
        open,
        total
    );
    assert!(count_tiles(&grid, Tile::Tree) > 0);
}

// ── Persistence tests ──────────────────────────────────────────────────

#[test]
fn generated_world_survives_save_and_load() {
    let (grid, _) = dungeon_world(3);

    let mut buffer = Vec::new();
    save_world(&mut buffer, &grid).expect("save failed");
    let loaded = load_world(&buffer[..]).expect("load failed");

    assert_eq!(loaded, grid);
    // Doors placed by generation stay interactable after the round trip.
    assert_eq!(
        loaded.interactable_positions(),
        grid.interactable_positions()
    );
}

// ── Simulation tests ───────────────────────────────────────────────────

#[test]
fn simulation_runs_a_dungeon_session() {
    let (grid, rooms) = dungeon_world(13);
    let tile_size = grid.tile_size();
    let mut sim = Simulation::new(grid);
    sim.physics = PhysicsConfig {
        gravity: 0.0,
        friction: 0.0,
    };

    let (px, py) = rooms[0].center();
    sim.spawn_player((px * tile_size) as f32, (py * tile_size) as f32);

    let (ex, ey) = rooms[rooms.len() - 1].center();
    sim.spawn_enemy(
        (ex * tile_size) as f32,
        (ey * tile_size) as f32,
        Enemy::new("skeleton", 4),
        15,
    );

    for _ in 0..120 {
        sim.update(1.0 / 60.0);
    }

    assert_eq!(sim.tick(), 120);
    assert_eq!(sim.enemy_count(), 1);

    let fov = sim.player_fov(8).expect("player spawned");
    assert!(fov.is_visible(px, py));
}

#[test]
fn enemy_chases_player_across_a_room() {
    let mut grid = TileGrid::new(32, 32, 8);
    grid.fill(Tile::Floor);
    let mut sim = Simulation::new(grid);
    sim.physics = PhysicsConfig {
        gravity: 0.0,
        friction: 0.0,
    };

    sim.spawn_player(40.0, 40.0);
    let enemy = sim.spawn_enemy(100.0, 40.0, Enemy::new("wolf", 5), 20);

    let start_distance = 60.0;
    for _ in 0..30 {
        sim.update(1.0 / 60.0);
    }

    let pos = *sim.entities.get::<&Position>(enemy).unwrap();
    let distance = ((pos.x - 40.0).powi(2) + (pos.y - 40.0).powi(2)).sqrt();
    assert!(
        distance < start_distance,
        "enemy should close in, distance still {}",
        distance
    );
    assert_eq!(
        sim.entities.get::<&Enemy>(enemy).unwrap().state,
        EnemyState::Chase
    );
}
