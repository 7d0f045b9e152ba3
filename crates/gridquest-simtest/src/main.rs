//! GridQuest Headless Simulation Harness
//!
//! Validates the spatial engine end to end without any rendering or input.
//! Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p gridquest-simtest
//!   cargo run -p gridquest-simtest -- --verbose

use gridquest_core::components::{Enemy, EnemyState, Position};
use gridquest_core::engine::Simulation;
use gridquest_core::fov;
use gridquest_core::generation::{self, DungeonParams};
use gridquest_core::grid::{PropertyBag, Tile, TileGrid};
use gridquest_core::nav;
use gridquest_core::persistence::{load_world, save_world};
use gridquest_core::physics::{self, PhysicsConfig};
use serde_json::json;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== GridQuest Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Grid walkability and metadata
    results.extend(validate_grid(verbose));

    // 2. Procedural generation sweep
    results.extend(validate_generation(verbose));

    // 3. Pathfinding on synthetic mazes
    results.extend(validate_pathfinding(verbose));

    // 4. Field of view
    results.extend(validate_fov(verbose));

    // 5. Physics and collision
    results.extend(validate_physics(verbose));

    // 6. Persistence round trips
    results.extend(validate_persistence(verbose));

    // 7. Full simulation session
    results.extend(validate_simulation(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Grid ─────────────────────────────────────────────────────────────

fn validate_grid(_verbose: bool) -> Vec<TestResult> {
    println!("--- Grid & Walkability ---");
    let mut results = Vec::new();

    let mut grid = TileGrid::new(16, 16, 8);
    grid.fill(Tile::Grass);
    grid.set_tile(4, 4, Tile::Wall);
    grid.set_tile(5, 5, Tile::Water);
    grid.set_tile(6, 6, Tile::Bridge);

    results.push(TestResult {
        name: "grid_walkability_by_category".into(),
        passed: grid.is_walkable_tile(0, 0)
            && !grid.is_walkable_tile(4, 4)
            && !grid.is_walkable_tile(5, 5)
            && grid.is_walkable_tile(6, 6),
        detail: "grass walkable, wall/water blocked, bridge walkable".into(),
    });

    // Blocked override restricts a walkable tile
    let mut bag = PropertyBag::new();
    bag.insert("blocked".to_string(), json!(true));
    grid.set_properties(1, 1, bag);
    results.push(TestResult {
        name: "grid_blocked_override".into(),
        passed: !grid.is_walkable_tile(1, 1),
        detail: "blocked:true makes grass unwalkable".into(),
    });

    // Out-of-bounds queries stay safe and false
    let oob_safe = !grid.is_walkable_tile(-1, 0)
        && !grid.is_walkable_tile(16, 0)
        && grid.get_tile(-5, -5) == Tile::Empty
        && !grid.is_walkable_world(-1, 0);
    results.push(TestResult {
        name: "grid_oob_safe".into(),
        passed: oob_safe,
        detail: "out-of-range reads return defaults".into(),
    });

    // World-coordinate conversion and interactables
    grid.add_interactable(2, 3);
    results.push(TestResult {
        name: "grid_world_coords".into(),
        passed: grid.is_interactable_world(16, 24)
            && grid.is_interactable_world(23, 31)
            && !grid.is_interactable_world(24, 24),
        detail: "pixel queries land on tile (2,3) across its full extent".into(),
    });

    results
}

// ── 2. Generation ───────────────────────────────────────────────────────

fn validate_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Procedural Generation ---");
    let mut results = Vec::new();

    // Dungeon connectivity across many seeds
    let mut connected_seeds = 0;
    let mut checked_seeds = 0;
    let seeds = 20u64;
    for seed in 0..seeds {
        let mut grid = TileGrid::new(64, 64, 8);
        let mut rng = generation::generation_rng(Some(seed));
        let rooms = generation::generate_dungeon(&mut grid, &DungeonParams::default(), &mut rng);
        if rooms.len() < 2 {
            continue;
        }
        checked_seeds += 1;
        let start = rooms[0].center();
        let all_reachable = rooms[1..].iter().all(|room| {
            !nav::find_path(
                start,
                room.center(),
                |x, y| grid.is_walkable_tile(x, y),
                50_000,
            )
            .is_empty()
        });
        if all_reachable {
            connected_seeds += 1;
        }
        if verbose {
            println!(
                "    seed {:2}: {} rooms, connected={}",
                seed,
                rooms.len(),
                all_reachable
            );
        }
    }
    results.push(TestResult {
        name: "gen_dungeon_connectivity".into(),
        passed: checked_seeds > 0 && connected_seeds == checked_seeds,
        detail: format!(
            "{}/{} multi-room seeds fully connected",
            connected_seeds, checked_seeds
        ),
    });

    // Terrain composition
    let mut grid = TileGrid::new(64, 64, 8);
    generation::generate_terrain(&mut grid, &mut generation::generation_rng(Some(1)));
    let mut counts = [0usize; 10];
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            counts[grid.get_tile(x, y).code() as usize] += 1;
        }
    }
    let open = counts[Tile::Grass.code() as usize] + counts[Tile::Path.code() as usize];
    let total = (grid.width() * grid.height()) as usize;
    results.push(TestResult {
        name: "gen_terrain_composition".into(),
        passed: open * 2 > total
            && counts[Tile::Tree.code() as usize] > 0
            && counts[Tile::Water.code() as usize] > 0,
        detail: format!(
            "open={} trees={} water={} of {}",
            open,
            counts[Tile::Tree.code() as usize],
            counts[Tile::Water.code() as usize],
            total
        ),
    });

    // Determinism
    let mut a = TileGrid::new(48, 48, 8);
    let mut b = TileGrid::new(48, 48, 8);
    generation::generate_terrain(&mut a, &mut generation::generation_rng(Some(9)));
    generation::generate_terrain(&mut b, &mut generation::generation_rng(Some(9)));
    results.push(TestResult {
        name: "gen_seed_determinism".into(),
        passed: a == b,
        detail: "same seed reproduces the same world".into(),
    });

    // Different seeds vary
    let mut c = TileGrid::new(48, 48, 8);
    generation::generate_terrain(&mut c, &mut generation::generation_rng(Some(10)));
    results.push(TestResult {
        name: "gen_seed_variation".into(),
        passed: a != c,
        detail: "different seeds produce different worlds".into(),
    });

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(_verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    let open = |x: i32, y: i32| (0..20).contains(&x) && (0..20).contains(&y);

    // Trivial path
    let same = nav::find_path((3, 3), (3, 3), open, 1000);
    results.push(TestResult {
        name: "path_same_cell".into(),
        passed: same == vec![(3, 3)],
        detail: "start == goal → single-cell path".into(),
    });

    // Straight line is Manhattan-optimal
    let line = nav::find_path((0, 0), (9, 0), open, 1000);
    results.push(TestResult {
        name: "path_straight_optimal".into(),
        passed: line.len() == 10,
        detail: format!("(0,0)→(9,0) = {} cells", line.len()),
    });

    // Routes around a wall with one gap
    let walled = |x: i32, y: i32| open(x, y) && !(x == 10 && y != 19);
    let around = nav::find_path((0, 0), (19, 0), walled, 10_000);
    results.push(TestResult {
        name: "path_routes_around_wall".into(),
        passed: !around.is_empty() && around.contains(&(10, 19)),
        detail: format!("detour through the gap, {} cells", around.len()),
    });

    // Unreachable goal
    let sealed = |x: i32, y: i32| open(x, y) && x != 10;
    let blocked = nav::find_path((0, 0), (19, 0), sealed, 10_000);
    results.push(TestResult {
        name: "path_unreachable_empty".into(),
        passed: blocked.is_empty(),
        detail: "sealed wall → empty path".into(),
    });

    // Expansion budget caps work
    let big_open = |x: i32, y: i32| (0..1000).contains(&x) && (0..1000).contains(&y);
    let capped = nav::find_path((0, 0), (999, 999), big_open, 10);
    results.push(TestResult {
        name: "path_expansion_budget".into(),
        passed: capped.is_empty(),
        detail: "10-expansion budget gives up on a 1000x1000 grid".into(),
    });

    results
}

// ── 4. Field of View ────────────────────────────────────────────────────

fn validate_fov(_verbose: bool) -> Vec<TestResult> {
    println!("--- Field of View ---");
    let mut results = Vec::new();

    let nothing = |_: i32, _: i32| false;

    // Open field: origin visible, coverage roughly a disc
    let open_fov = fov::compute_fov((10, 10), 5, 21, 21, nothing);
    results.push(TestResult {
        name: "fov_open_field".into(),
        passed: open_fov.is_visible(10, 10) && open_fov.visible_count() > 40,
        detail: format!("{} cells visible at radius 5", open_fov.visible_count()),
    });

    // Obstacles are visible but block what lies beyond
    let wall = |x: i32, _y: i32| x == 12;
    let walled_fov = fov::compute_fov((10, 10), 8, 21, 21, wall);
    results.push(TestResult {
        name: "fov_wall_blocks".into(),
        passed: walled_fov.is_visible(12, 10) && !walled_fov.is_visible(14, 10),
        detail: "wall cell visible, cells behind it dark".into(),
    });

    // Radius zero still reveals the origin
    let self_only = fov::compute_fov((3, 3), 0, 8, 8, nothing);
    results.push(TestResult {
        name: "fov_radius_zero".into(),
        passed: self_only.is_visible(3, 3) && self_only.visible_count() == 1,
        detail: "radius 0 → origin only".into(),
    });

    // Rays stop at the world edge
    let edge_fov = fov::compute_fov((1, 1), 10, 4, 4, nothing);
    results.push(TestResult {
        name: "fov_respects_bounds".into(),
        passed: edge_fov.visible_count() <= 16 && !edge_fov.is_visible(5, 5),
        detail: "no marks outside the 4x4 world".into(),
    });

    results
}

// ── 5. Physics & Collision ──────────────────────────────────────────────

fn validate_physics(_verbose: bool) -> Vec<TestResult> {
    println!("--- Physics & Collision ---");
    let mut results = Vec::new();

    // AABB overlap: strict inequalities so touching edges don't collide
    results.push(TestResult {
        name: "physics_aabb_edges".into(),
        passed: physics::aabb_overlap(0.0, 0.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0)
            && !physics::aabb_overlap(0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0),
        detail: "overlap detected, edge contact is not a collision".into(),
    });

    // Movement validation against obstacle list
    let obstacles = [(10.0, 0.0, 4.0, 4.0)];
    results.push(TestResult {
        name: "physics_can_move_to".into(),
        passed: physics::can_move_to(0.0, 0.0, 2.0, 2.0, &obstacles)
            && !physics::can_move_to(9.0, 1.0, 2.0, 2.0, &obstacles),
        detail: "clear spot allowed, overlapping spot rejected".into(),
    });

    // Gravity accelerates airborne bodies; velocity applies after
    let cfg = PhysicsConfig::default();
    let ((_, y), (_, vy)) = cfg.step((0.0, 0.0), (0.0, 0.0), false, 1.0);
    results.push(TestResult {
        name: "physics_gravity_airborne".into(),
        passed: vy > 9.7 && y > 9.7,
        detail: format!("after 1s: vy={:.2} y={:.2}", vy, y),
    });

    // Ground friction decays toward zero and never flips the sign
    let slow = PhysicsConfig {
        gravity: 0.0,
        friction: 10.0,
    };
    let ((_, _), (vx, _)) = slow.step((0.0, 0.0), (1.0, 0.0), true, 1.0);
    results.push(TestResult {
        name: "physics_friction_clamps".into(),
        passed: vx == 0.0,
        detail: "heavy friction stops at exactly zero".into(),
    });

    // Projectile arc rises, peaks, and falls back under gravity
    let arc = cfg.projectile_path((0.0, 0.0), (10.0, -10.0), 180, 1.0 / 60.0);
    let apex = arc
        .iter()
        .map(|&(_, y)| y)
        .fold(f32::INFINITY, f32::min);
    let final_y = arc.last().map(|&(_, y)| y).unwrap_or(0.0);
    results.push(TestResult {
        name: "physics_projectile_arc".into(),
        passed: arc.len() == 181 && apex < 0.0 && final_y > apex,
        detail: format!("apex={:.2}, settles back to {:.2}", apex, final_y),
    });

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    // Generated dungeon round trips exactly
    let mut grid = TileGrid::new(64, 64, 8);
    grid.name = "harness-dungeon".to_string();
    let mut rng = generation::generation_rng(Some(4));
    generation::generate_dungeon(&mut grid, &DungeonParams::default(), &mut rng);
    grid.add_region("entry", "Entry Hall", 0, 0, 16, 16);

    let mut buffer = Vec::new();
    let saved = save_world(&mut buffer, &grid).is_ok();
    let loaded = load_world(&buffer[..]);
    results.push(TestResult {
        name: "persist_round_trip".into(),
        passed: saved && loaded.as_ref().map(|l| l == &grid).unwrap_or(false),
        detail: format!("{} bytes of JSON round-tripped", buffer.len()),
    });

    // Corrupt data fails loudly instead of producing a broken world
    let garbage = load_world(&b"{ \"name\": \"x\" "[..]);
    results.push(TestResult {
        name: "persist_rejects_garbage".into(),
        passed: garbage.is_err(),
        detail: "truncated JSON is an error, not a world".into(),
    });

    results
}

// ── 7. Simulation ───────────────────────────────────────────────────────

fn validate_simulation(verbose: bool) -> Vec<TestResult> {
    println!("--- Simulation Session ---");
    let mut results = Vec::new();

    let mut grid = TileGrid::new(64, 64, 8);
    let mut rng = generation::generation_rng(Some(21));
    let rooms = generation::generate_dungeon(&mut grid, &DungeonParams::default(), &mut rng);
    if rooms.len() < 2 {
        results.push(TestResult {
            name: "sim_setup".into(),
            passed: false,
            detail: "seed produced fewer than two rooms".into(),
        });
        return results;
    }

    let tile_size = grid.tile_size();
    let mut sim = Simulation::new(grid);
    sim.physics = PhysicsConfig {
        gravity: 0.0,
        friction: 0.0,
    };

    let (px, py) = rooms[0].center();
    let player = sim.spawn_player((px * tile_size) as f32, (py * tile_size) as f32);
    let (ex, ey) = rooms[1].center();
    let enemy = sim.spawn_enemy(
        (ex * tile_size) as f32,
        (ey * tile_size) as f32,
        Enemy::new("skeleton", 4).with_speed(2.0),
        15,
    );

    let start = *sim.entities.get::<&Position>(enemy).unwrap();
    for _ in 0..600 {
        sim.update(1.0 / 60.0);
    }

    let player_pos = *sim.entities.get::<&Position>(player).unwrap();
    let end = *sim.entities.get::<&Position>(enemy).unwrap();
    let before = start.distance_to(&player_pos);
    let after = end.distance_to(&player_pos);
    let state = sim.entities.get::<&Enemy>(enemy).unwrap().state;

    if verbose {
        println!(
            "    enemy {:?} → {:?}, distance {:.1} → {:.1}, state {:?}",
            (start.x, start.y),
            (end.x, end.y),
            before,
            after,
            state
        );
    }

    // Within detection range the enemy must close in; far spawns may idle
    results.push(TestResult {
        name: "sim_enemy_behaves".into(),
        passed: if before <= 80.0 {
            after < before
        } else {
            state == EnemyState::Idle || after <= before
        },
        detail: format!("distance {:.1} → {:.1} over 600 ticks", before, after),
    });

    // Player sees their own room
    let fov = sim.player_fov(8);
    results.push(TestResult {
        name: "sim_player_fov".into(),
        passed: fov.map(|f| f.is_visible(px, py)).unwrap_or(false),
        detail: "player tile visible in its own FOV".into(),
    });

    // Engine paths between the first two room centers
    let path = sim.find_path(rooms[0].center(), rooms[1].center());
    results.push(TestResult {
        name: "sim_find_path".into(),
        passed: !path.is_empty(),
        detail: format!("{}-cell route between rooms", path.len()),
    });

    results.push(TestResult {
        name: "sim_tick_count".into(),
        passed: sim.tick() == 600,
        detail: format!("{} ticks advanced", sim.tick()),
    });

    results
}
