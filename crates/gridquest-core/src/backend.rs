//! Pluggable engine backend.
//!
//! The four hot-path operations sit behind one trait so a future
//! optimized implementation (SIMD, FFI, whatever) can be swapped in
//! without touching callers. The provided methods *are* the reference
//! implementation; `ReferenceCore` simply adopts them.

use crate::fov::{self, VisibilityGrid};
use crate::nav;
use crate::physics::PhysicsConfig;

/// The engine's performance-critical operations.
pub trait EngineCore {
    /// A* path over an arbitrary walkability predicate. See [`nav::find_path`].
    fn find_path(
        &self,
        start: (i32, i32),
        goal: (i32, i32),
        walkable: &dyn Fn(i32, i32) -> bool,
        max_expansions: usize,
    ) -> Vec<(i32, i32)> {
        nav::find_path(start, goal, walkable, max_expansions)
    }

    /// Ray-cast field of view. See [`fov::compute_fov`].
    fn compute_fov(
        &self,
        origin: (i32, i32),
        radius: u32,
        width: i32,
        height: i32,
        obstacle: &dyn Fn(i32, i32) -> bool,
    ) -> VisibilityGrid {
        fov::compute_fov(origin, radius, width, height, obstacle)
    }

    /// AABB overlap test. See [`crate::physics::aabb_overlap`].
    #[allow(clippy::too_many_arguments)]
    fn aabb_overlap(
        &self,
        ax: f32,
        ay: f32,
        aw: f32,
        ah: f32,
        bx: f32,
        by: f32,
        bw: f32,
        bh: f32,
    ) -> bool {
        crate::physics::aabb_overlap(ax, ay, aw, ah, bx, by, bw, bh)
    }

    /// One semi-implicit Euler tick. See [`PhysicsConfig::step`].
    fn step(
        &self,
        config: &PhysicsConfig,
        position: (f32, f32),
        velocity: (f32, f32),
        on_ground: bool,
        dt: f32,
    ) -> ((f32, f32), (f32, f32)) {
        config.step(position, velocity, on_ground, dt)
    }
}

/// The pure-Rust reference backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceCore;

impl EngineCore for ReferenceCore {}
