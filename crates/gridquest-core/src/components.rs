//! Plain-data components for the entity layer.
//!
//! Components carry no behavior beyond small helpers; the systems module
//! queries and updates them.

use serde::{Deserialize, Serialize};

/// World-space (pixel) position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Tile coordinates under this position.
    pub fn tile(&self, tile_size: i32) -> (i32, i32) {
        (
            (self.x.floor() as i32).div_euclid(tile_size),
            (self.y.floor() as i32).div_euclid(tile_size),
        )
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// World-space velocity in units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Collision footprint, anchored at the entity's position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub width: f32,
    pub height: f32,
    /// Whether the entity currently rests on ground; gates gravity and
    /// friction in the integrator.
    pub on_ground: bool,
}

impl Body {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            on_ground: true,
        }
    }

    /// The entity's AABB as (x, y, w, h) given its position.
    pub fn rect(&self, pos: &Position) -> (f32, f32, f32, f32) {
        (pos.x, pos.y, self.width, self.height)
    }

    /// AABB test between two positioned bodies.
    pub fn collides_with(&self, pos: &Position, other: &Body, other_pos: &Position) -> bool {
        crate::physics::aabb_overlap(
            pos.x,
            pos.y,
            self.width,
            self.height,
            other_pos.x,
            other_pos.y,
            other.width,
            other.height,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage, flooring at zero. Returns true while still alive.
    pub fn damage(&mut self, amount: i32) -> bool {
        self.current = (self.current - amount).max(0);
        self.current > 0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Marker for the player entity; the enemy system targets it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Behavior states for the enemy controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Patrol,
    Chase,
    Attack,
}

/// Enemy controller state: detection/attack tuning plus the FSM bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub state: EnemyState,
    pub damage: i32,
    /// Movement in world units per tick.
    pub movement_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Ticks between attacks.
    pub attack_cooldown: u32,
    pub attack_timer: u32,
    pub patrol_points: Vec<(f32, f32)>,
    pub patrol_index: usize,
}

impl Enemy {
    pub fn new(name: impl Into<String>, damage: i32) -> Self {
        Self {
            name: name.into(),
            state: EnemyState::Idle,
            damage,
            movement_speed: 1.0,
            detection_range: 80.0,
            attack_range: 10.0,
            attack_cooldown: 30,
            attack_timer: 0,
            patrol_points: Vec::new(),
            patrol_index: 0,
        }
    }

    pub fn with_patrol(mut self, points: Vec<(f32, f32)>) -> Self {
        self.patrol_points = points;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Being hurt makes a passive enemy aggressive.
    pub fn aggro(&mut self) {
        if self.state != EnemyState::Attack && self.state != EnemyState::Chase {
            self.state = EnemyState::Chase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tile_conversion() {
        let pos = Position::new(17.0, 7.9);
        assert_eq!(pos.tile(8), (2, 0));
        let neg = Position::new(-1.0, 0.0);
        assert_eq!(neg.tile(8), (-1, 0));
    }

    #[test]
    fn test_body_collision() {
        let body = Body::new(8.0, 8.0);
        let a = Position::new(0.0, 0.0);
        let b = Position::new(4.0, 4.0);
        let c = Position::new(8.0, 0.0);
        assert!(body.collides_with(&a, &body, &b));
        assert!(!body.collides_with(&a, &body, &c), "touching edges do not collide");
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut health = Health::new(10);
        assert!(health.damage(4));
        assert_eq!(health.current, 6);
        assert!(!health.damage(100));
        assert_eq!(health.current, 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_aggro_transitions() {
        let mut enemy = Enemy::new("slime", 5);
        enemy.aggro();
        assert_eq!(enemy.state, EnemyState::Chase);

        enemy.state = EnemyState::Attack;
        enemy.aggro();
        assert_eq!(enemy.state, EnemyState::Attack, "attacking stays attacking");
    }
}
