//! Enemy behavior system - a four-state controller (idle, patrol, chase,
//! attack) driven by walkability queries and pathfinding.

use hecs::{Entity, World};

use crate::components::{Enemy, EnemyState, Health, Player, Position};
use crate::grid::TileGrid;
use crate::nav;

/// Ticks between patrol-start checks while idle.
const PATROL_CHECK_INTERVAL: u64 = 180;
/// Chase gives up once the player is this factor beyond detection range.
const LOSE_INTEREST_FACTOR: f32 = 1.5;

/// Advance every enemy by one tick.
///
/// Targets the entity carrying the `Player` marker; without one the system
/// is a no-op. Updates are collected first and applied after the query so
/// the world is never mutated mid-iteration.
pub fn enemy_ai_system(world: &mut World, grid: &TileGrid, tick: u64) {
    let mut player = None;
    for (entity, (_, pos)) in world.query::<(&Player, &Position)>().iter() {
        player = Some((entity, *pos));
        break;
    }
    let Some((player_entity, player_pos)) = player else {
        return;
    };

    let mut updates: Vec<(Entity, Position, Enemy)> = Vec::new();
    let mut damage_to_player = 0;

    for (entity, (pos, enemy)) in world.query::<(&Position, &Enemy)>().iter() {
        let mut pos = *pos;
        let mut enemy = enemy.clone();

        if enemy.attack_timer > 0 {
            enemy.attack_timer -= 1;
        }

        let player_distance = pos.distance_to(&player_pos);

        match enemy.state {
            EnemyState::Idle => {
                if tick % PATROL_CHECK_INTERVAL == 0 && !enemy.patrol_points.is_empty() {
                    enemy.state = EnemyState::Patrol;
                }
                if player_distance <= enemy.detection_range {
                    enemy.state = EnemyState::Chase;
                }
            }
            EnemyState::Patrol => {
                patrol_step(&mut pos, &mut enemy, grid);
                if player_distance <= enemy.detection_range {
                    enemy.state = EnemyState::Chase;
                }
            }
            EnemyState::Chase => {
                chase_step(&mut pos, &enemy, &player_pos, grid);
                if player_distance <= enemy.attack_range {
                    enemy.state = EnemyState::Attack;
                } else if player_distance > enemy.detection_range * LOSE_INTEREST_FACTOR {
                    enemy.state = EnemyState::Idle;
                }
            }
            EnemyState::Attack => {
                if enemy.attack_timer == 0 {
                    damage_to_player += enemy.damage;
                    enemy.attack_timer = enemy.attack_cooldown;
                }
                if player_distance > enemy.attack_range {
                    enemy.state = EnemyState::Chase;
                }
            }
        }

        updates.push((entity, pos, enemy));
    }

    for (entity, pos, enemy) in updates {
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = pos;
        }
        if let Ok(mut e) = world.get::<&mut Enemy>(entity) {
            *e = enemy;
        }
    }

    if damage_to_player > 0 {
        if let Ok(mut health) = world.get::<&mut Health>(player_entity) {
            health.damage(damage_to_player);
        }
    }
}

/// Walk the patrol loop; an empty loop drops back to idle.
fn patrol_step(pos: &mut Position, enemy: &mut Enemy, grid: &TileGrid) {
    if enemy.patrol_points.is_empty() {
        enemy.state = EnemyState::Idle;
        return;
    }

    let target = enemy.patrol_points[enemy.patrol_index];
    move_toward(pos, target, enemy.movement_speed, grid);

    if (pos.x - target.0).abs() < enemy.movement_speed
        && (pos.y - target.1).abs() < enemy.movement_speed
    {
        enemy.patrol_index = (enemy.patrol_index + 1) % enemy.patrol_points.len();
    }
}

/// Head straight for the player; when both direct axis steps are blocked,
/// fall back to an A* path at tile granularity and walk its next cell.
fn chase_step(pos: &mut Position, enemy: &Enemy, player_pos: &Position, grid: &TileGrid) {
    if move_toward(pos, (player_pos.x, player_pos.y), enemy.movement_speed, grid) {
        return;
    }

    let tile_size = grid.tile_size();
    let start = pos.tile(tile_size);
    let goal = player_pos.tile(tile_size);
    let path = nav::find_path(
        start,
        goal,
        |x, y| grid.is_walkable_tile(x, y),
        nav::DEFAULT_MAX_EXPANSIONS,
    );

    if let Some(&(next_x, next_y)) = path.get(1) {
        let center_x = (next_x * tile_size) as f32 + tile_size as f32 / 2.0;
        let center_y = (next_y * tile_size) as f32 + tile_size as f32 / 2.0;
        move_toward(pos, (center_x, center_y), enemy.movement_speed, grid);
    }
}

/// Axis-separated movement: x and y advance independently, each gated by
/// a walkability check, so entities slide along walls instead of sticking.
/// Returns whether the position changed.
fn move_toward(pos: &mut Position, target: (f32, f32), speed: f32, grid: &TileGrid) -> bool {
    let dx = if pos.x < target.0 {
        speed
    } else if pos.x > target.0 {
        -speed
    } else {
        0.0
    };
    let dy = if pos.y < target.1 {
        speed
    } else if pos.y > target.1 {
        -speed
    } else {
        0.0
    };

    let mut moved = false;

    let new_x = pos.x + dx;
    if dx != 0.0 && grid.is_walkable_world(new_x.floor() as i32, pos.y.floor() as i32) {
        pos.x = new_x;
        moved = true;
    }

    let new_y = pos.y + dy;
    if dy != 0.0 && grid.is_walkable_world(pos.x.floor() as i32, new_y.floor() as i32) {
        pos.y = new_y;
        moved = true;
    }

    moved
}

/// Apply damage to an enemy entity. A hurt enemy turns aggressive.
/// Returns true while the enemy is still alive.
pub fn damage_enemy(world: &mut World, entity: Entity, amount: i32) -> bool {
    let alive = match world.get::<&mut Health>(entity) {
        Ok(mut health) => health.damage(amount),
        Err(_) => return false,
    };
    if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
        enemy.aggro();
    }
    alive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn open_grid() -> TileGrid {
        let mut grid = TileGrid::new(32, 32, 8);
        grid.fill(Tile::Floor);
        grid
    }

    fn spawn_player(world: &mut World, x: f32, y: f32) -> Entity {
        world.spawn((Player, Position::new(x, y), Health::new(100)))
    }

    #[test]
    fn test_idle_detects_nearby_player() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 50.0, 10.0);
        let enemy = world.spawn((Position::new(10.0, 10.0), Enemy::new("bat", 3)));

        enemy_ai_system(&mut world, &grid, 1);

        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.state, EnemyState::Chase);
    }

    #[test]
    fn test_idle_ignores_distant_player() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 250.0, 10.0);
        let enemy = world.spawn((Position::new(10.0, 10.0), Enemy::new("bat", 3)));

        enemy_ai_system(&mut world, &grid, 1);

        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.state, EnemyState::Idle);
    }

    #[test]
    fn test_chase_closes_distance() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 100.0, 10.0);
        let mut e = Enemy::new("wolf", 5).with_speed(2.0);
        e.state = EnemyState::Chase;
        let enemy = world.spawn((Position::new(10.0, 10.0), e));

        enemy_ai_system(&mut world, &grid, 1);

        let pos = world.get::<&Position>(enemy).unwrap();
        assert!(pos.x > 10.0, "enemy should move toward the player");
    }

    #[test]
    fn test_chase_gives_up_far_away() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 200.0, 10.0);
        let mut e = Enemy::new("wolf", 5);
        e.state = EnemyState::Chase;
        let enemy = world.spawn((Position::new(10.0, 10.0), e));

        // Distance 190 > 80 * 1.5.
        enemy_ai_system(&mut world, &grid, 1);

        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.state, EnemyState::Idle);
    }

    #[test]
    fn test_attack_damages_player_then_cools_down() {
        let grid = open_grid();
        let mut world = World::new();
        let player = spawn_player(&mut world, 14.0, 10.0);
        let mut e = Enemy::new("ogre", 7);
        e.state = EnemyState::Attack;
        world.spawn((Position::new(10.0, 10.0), e));

        enemy_ai_system(&mut world, &grid, 1);
        assert_eq!(world.get::<&Health>(player).unwrap().current, 93);

        // Cooldown holds the next swing.
        enemy_ai_system(&mut world, &grid, 2);
        assert_eq!(world.get::<&Health>(player).unwrap().current, 93);
    }

    #[test]
    fn test_attack_reverts_to_chase_out_of_range() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 100.0, 10.0);
        let mut e = Enemy::new("ogre", 7);
        e.state = EnemyState::Attack;
        e.attack_timer = 5; // mid-cooldown, no swing this tick
        let enemy = world.spawn((Position::new(10.0, 10.0), e));

        enemy_ai_system(&mut world, &grid, 1);

        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.state, EnemyState::Chase);
    }

    #[test]
    fn test_patrol_advances_through_points() {
        let grid = open_grid();
        let mut world = World::new();
        spawn_player(&mut world, 250.0, 250.0);
        let mut e = Enemy::new("guard", 4)
            .with_patrol(vec![(12.0, 10.0), (10.0, 20.0)])
            .with_speed(1.0);
        e.state = EnemyState::Patrol;
        let enemy = world.spawn((Position::new(10.0, 10.0), e));

        for tick in 1..=3 {
            enemy_ai_system(&mut world, &grid, tick);
        }

        let e = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(e.patrol_index, 1, "first patrol point reached and passed");
    }

    #[test]
    fn test_walls_block_movement() {
        let mut grid = open_grid();
        // Box the enemy into tile (1, 1).
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2), (0, 0), (2, 0), (0, 2), (2, 2)] {
            grid.set_tile(x, y, Tile::Wall);
        }
        let mut world = World::new();
        spawn_player(&mut world, 60.0, 12.0);
        let mut e = Enemy::new("rat", 1);
        e.state = EnemyState::Chase;
        let enemy = world.spawn((Position::new(12.0, 12.0), e));

        for tick in 1..=20 {
            enemy_ai_system(&mut world, &grid, tick);
        }

        // It can slide to the edge of its own tile but never into the wall.
        let pos = world.get::<&Position>(enemy).unwrap();
        assert_eq!((pos.x, pos.y), (15.0, 12.0));
    }

    #[test]
    fn test_damage_enemy_aggros() {
        let mut world = World::new();
        let enemy = world.spawn((
            Position::new(0.0, 0.0),
            Enemy::new("slime", 2),
            Health::new(10),
        ));

        assert!(damage_enemy(&mut world, enemy, 4));
        assert_eq!(world.get::<&Enemy>(enemy).unwrap().state, EnemyState::Chase);
        assert!(!damage_enemy(&mut world, enemy, 100));
    }
}
