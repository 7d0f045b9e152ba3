//! Ray-cast field of view.
//!
//! Casts 72 rays at 5-degree steps (a performance/precision trade-off
//! inherited from the tuned reference constants) and marks every tile a
//! ray passes through until it leaves the map or hits an obstacle. The
//! result is recomputed from scratch on every call; nothing is cached
//! between origin moves.

/// Angular step between rays, in degrees.
const RAY_STEP_DEGREES: usize = 5;

/// Boolean visibility grid with bounds-safe reads.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGrid {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl VisibilityGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether a tile is visible. Out-of-bounds reads return false.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.cells[(y * self.width + x) as usize]
    }

    fn mark(&mut self, x: i32, y: i32) {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            self.cells[(y * self.width + x) as usize] = true;
        }
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }
}

/// Compute the field of view from `origin` out to `radius` steps.
///
/// `obstacle` returns true for tiles that block sight. Obstacle tiles are
/// themselves marked visible (you can see the wall, not past it). Rays are
/// independent; marking the same tile twice is idempotent.
pub fn compute_fov<F>(
    origin: (i32, i32),
    radius: u32,
    width: i32,
    height: i32,
    obstacle: F,
) -> VisibilityGrid
where
    F: Fn(i32, i32) -> bool,
{
    let mut visible = VisibilityGrid::new(width, height);

    // Origin is visible unconditionally when in bounds.
    visible.mark(origin.0, origin.1);

    for angle in (0..360).step_by(RAY_STEP_DEGREES) {
        let rad = (angle as f32).to_radians();
        let (step_x, step_y) = (rad.cos(), rad.sin());
        let mut ray_x = origin.0 as f32;
        let mut ray_y = origin.1 as f32;

        for _ in 0..radius {
            ray_x += step_x;
            ray_y += step_y;

            let tile_x = ray_x.round() as i32;
            let tile_y = ray_y.round() as i32;

            // Leaving the map kills the ray without marking anything.
            if tile_x < 0 || tile_x >= width || tile_y < 0 || tile_y >= height {
                break;
            }

            visible.mark(tile_x, tile_y);

            if obstacle(tile_x, tile_y) {
                break;
            }
        }
    }

    visible
}
