//! Collision testing and physics integration.
//!
//! Pure functions over plain rectangles and (position, velocity) pairs;
//! no entity state lives here.

use serde::{Deserialize, Serialize};

/// Axis-aligned box overlap with half-open intervals: boxes that merely
/// share an edge do not overlap.
#[allow(clippy::too_many_arguments)]
pub fn aabb_overlap(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Check whether a box placed at `(new_x, new_y)` clears every obstacle
/// rectangle in the slice.
pub fn can_move_to(
    new_x: f32,
    new_y: f32,
    width: f32,
    height: f32,
    obstacles: &[(f32, f32, f32, f32)],
) -> bool {
    !obstacles
        .iter()
        .any(|&(ox, oy, ow, oh)| aabb_overlap(new_x, new_y, width, height, ox, oy, ow, oh))
}

/// Tuning constants for the integrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Downward acceleration applied while airborne, units per second squared.
    pub gravity: f32,
    /// Horizontal deceleration applied while grounded, units per second squared.
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            friction: 0.1,
        }
    }
}

impl PhysicsConfig {
    pub fn new(gravity: f32, friction: f32) -> Self {
        Self { gravity, friction }
    }

    /// Advance one tick of semi-implicit Euler.
    ///
    /// Velocity updates first (gravity when airborne, sign-clamped ground
    /// friction), then position advances using the updated velocity.
    /// Friction never reverses direction: it clamps at exactly zero.
    pub fn step(
        &self,
        position: (f32, f32),
        velocity: (f32, f32),
        on_ground: bool,
        dt: f32,
    ) -> ((f32, f32), (f32, f32)) {
        let (px, py) = position;
        let (vx, vy) = velocity;

        let new_vy = if on_ground { vy } else { vy + self.gravity * dt };

        let new_vx = if on_ground {
            if vx > 0.0 {
                (vx - self.friction * dt).max(0.0)
            } else if vx < 0.0 {
                (vx + self.friction * dt).min(0.0)
            } else {
                vx
            }
        } else {
            vx
        };

        let new_px = px + new_vx * dt;
        let new_py = py + new_vy * dt;

        ((new_px, new_py), (new_vx, new_vy))
    }

    /// Sample a projectile trajectory under gravity with simplified air
    /// drag on the horizontal axis. The returned samples include the start
    /// point, giving `steps + 1` entries.
    pub fn projectile_path(
        &self,
        start: (f32, f32),
        velocity: (f32, f32),
        steps: usize,
        dt: f32,
    ) -> Vec<(f32, f32)> {
        let mut path = Vec::with_capacity(steps + 1);
        let (mut px, mut py) = start;
        let (mut vx, mut vy) = velocity;

        path.push((px, py));

        for _ in 0..steps {
            vx *= 1.0 - 0.01 * dt;
            vy += self.gravity * dt;
            px += vx * dt;
            py += vy * dt;
            path.push((px, py));
        }

        path
    }
}
