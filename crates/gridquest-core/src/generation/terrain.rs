//! Overworld terrain generation: grass base, water blobs, wandering paths
//! and scattered trees/rocks.

use rand::Rng;

use crate::grid::{Tile, TileGrid};

/// Fill the entire grid with floor tiles. Trivial baseline world.
pub fn generate_empty(grid: &mut TileGrid) {
    grid.fill(Tile::Floor);
}

/// Generate organic terrain.
///
/// RNG consumption order is fixed (water blobs, then paths, then trees,
/// then rocks) so identical seeds reproduce identical worlds.
pub fn generate_terrain(grid: &mut TileGrid, rng: &mut impl Rng) {
    grid.fill(Tile::Grass);

    carve_water_blobs(grid, rng);
    carve_paths(grid, rng);

    // Scatter decorations, only ever replacing grass so water and paths
    // survive intact.
    let area = grid.width() * grid.height();
    scatter(grid, rng, Tile::Tree, area / 50, area / 30);
    scatter(grid, rng, Tile::Rock, area / 100, area / 70);
}

/// Stamp 3-8 irregular water bodies. Each cell inside a blob's bounding
/// box becomes water when its distance to the center falls under
/// `radius * U(0.7, 1.0)` - the per-cell randomized threshold is what
/// produces the noisy coastline, so it must stay per-cell.
fn carve_water_blobs(grid: &mut TileGrid, rng: &mut impl Rng) {
    let (w, h) = (grid.width(), grid.height());
    if w <= 10 || h <= 10 {
        return;
    }

    let num_blobs = rng.gen_range(3..=8);
    for _ in 0..num_blobs {
        let center_x = rng.gen_range(5..=w - 5);
        let center_y = rng.gen_range(5..=h - 5);
        let radius = rng.gen_range(3..=10);

        for y in center_y - radius..center_y + radius {
            for x in center_x - radius..center_x + radius {
                if grid.in_bounds(x, y) {
                    let dx = (x - center_x) as f64;
                    let dy = (y - center_y) as f64;
                    let dist = (dx * dx + dy * dy).sqrt();
                    if dist < radius as f64 * rng.gen_range(0.7..1.0) {
                        grid.set_tile(x, y, Tile::Water);
                    }
                }
            }
        }
    }
}

/// Carve 3-6 paths, each a biased random walk toward its target: step one
/// cell toward the misaligned axis with probability 0.7 (x tried before
/// y), otherwise take a uniform cardinal step.
fn carve_paths(grid: &mut TileGrid, rng: &mut impl Rng) {
    let (w, h) = (grid.width(), grid.height());
    if w == 0 || h == 0 {
        return;
    }

    let num_paths = rng.gen_range(3..=6);
    for _ in 0..num_paths {
        let mut x = rng.gen_range(0..w);
        let mut y = rng.gen_range(0..h);
        let end_x = rng.gen_range(0..w);
        let end_y = rng.gen_range(0..h);

        while (x, y) != (end_x, end_y) {
            grid.set_tile(x, y, Tile::Path);

            if x < end_x && rng.gen::<f64>() < 0.7 {
                x += 1;
            } else if x > end_x && rng.gen::<f64>() < 0.7 {
                x -= 1;
            } else if y < end_y && rng.gen::<f64>() < 0.7 {
                y += 1;
            } else if y > end_y && rng.gen::<f64>() < 0.7 {
                y -= 1;
            } else {
                // Unbiased wander keeps paths from running dead straight.
                let dirs = [(1, 0), (-1, 0), (0, 1), (0, -1)];
                let (dx, dy) = dirs[rng.gen_range(0..dirs.len())];
                if grid.in_bounds(x + dx, y + dy) {
                    x += dx;
                    y += dy;
                }
            }
        }
    }
}

fn scatter(grid: &mut TileGrid, rng: &mut impl Rng, tile: Tile, min: i32, max: i32) {
    let (w, h) = (grid.width(), grid.height());
    if w == 0 || h == 0 || max < min {
        return;
    }

    let count = rng.gen_range(min..=max);
    for _ in 0..count {
        let x = rng.gen_range(0..w);
        let y = rng.gen_range(0..h);
        if grid.get_tile(x, y) == Tile::Grass {
            grid.set_tile(x, y, tile);
        }
    }
}
