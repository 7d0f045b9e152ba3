//! Dungeon generation: non-overlapping rooms chained by L-shaped
//! corridors, with doors punched through room boundaries.

use rand::Rng;

use crate::grid::{Tile, TileGrid};

/// Generation-time room rectangle. Discarded once corridors are carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Standard AABB intersection test between room rectangles.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Dungeon generator parameters.
#[derive(Debug, Clone, Copy)]
pub struct DungeonParams {
    /// Number of room placement *attempts*; overlapping proposals are
    /// discarded, not retried, so the final count is usually lower.
    pub num_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    /// Chance for an eligible boundary wall cell to become a door.
    pub door_chance: f64,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            num_rooms: 10,
            room_min_size: 3,
            room_max_size: 8,
            door_chance: 0.3,
        }
    }
}

/// Generate a dungeon in place and return the accepted rooms.
///
/// RNG consumption order is fixed: rooms in placement order, then
/// corridors, then doors, so a seeded run is reproducible.
pub fn generate_dungeon(grid: &mut TileGrid, params: &DungeonParams, rng: &mut impl Rng) -> Vec<Room> {
    grid.fill(Tile::Wall);

    let min_size = params.room_min_size.max(1);
    // Rooms need a one-tile wall border on every side.
    let max_size = params
        .room_max_size
        .min(grid.width() - 2)
        .min(grid.height() - 2);
    if max_size < min_size {
        return Vec::new();
    }

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..params.num_rooms {
        let w = rng.gen_range(min_size..=max_size);
        let h = rng.gen_range(min_size..=max_size);
        let x = rng.gen_range(1..=grid.width() - w - 1);
        let y = rng.gen_range(1..=grid.height() - h - 1);
        let room = Room::new(x, y, w, h);

        if rooms.iter().any(|r| r.intersects(&room)) {
            continue;
        }

        for ry in room.y..room.y + room.height {
            for rx in room.x..room.x + room.width {
                grid.set_tile(rx, ry, Tile::Floor);
            }
        }
        rooms.push(room);
    }

    connect_rooms(grid, &rooms, rng);
    place_doors(grid, &rooms, params.door_chance, rng);

    rooms
}

/// Chain each room to its predecessor with an L-shaped corridor between
/// their centers. Sequential chaining keeps every room reachable.
fn connect_rooms(grid: &mut TileGrid, rooms: &[Room], rng: &mut impl Rng) {
    for i in 1..rooms.len() {
        let (prev_x, prev_y) = rooms[i - 1].center();
        let (new_x, new_y) = rooms[i].center();

        if rng.gen::<f64>() < 0.5 {
            carve_horizontal(grid, prev_x, new_x, prev_y);
            carve_vertical(grid, prev_y, new_y, new_x);
        } else {
            carve_vertical(grid, prev_y, new_y, prev_x);
            carve_horizontal(grid, prev_x, new_x, new_y);
        }
    }
}

fn carve_horizontal(grid: &mut TileGrid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        grid.set_tile(x, y, Tile::Floor);
    }
}

fn carve_vertical(grid: &mut TileGrid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        grid.set_tile(x, y, Tile::Floor);
    }
}

/// Convert boundary wall cells into doors where a corridor runs just
/// outside: the pattern looked for is wall-then-floor moving outward from
/// the room edge. Doors are marked interactable.
fn place_doors(grid: &mut TileGrid, rooms: &[Room], chance: f64, rng: &mut impl Rng) {
    for room in rooms {
        let (x, y, w, h) = (room.x, room.y, room.width, room.height);

        for room_x in x..x + w {
            if room_x > 0 && room_x < grid.width() - 1 {
                // North wall.
                if y > 1
                    && grid.get_tile(room_x, y - 1) == Tile::Wall
                    && grid.get_tile(room_x, y - 2) == Tile::Floor
                    && rng.gen::<f64>() < chance
                {
                    grid.set_tile(room_x, y - 1, Tile::Door);
                    grid.add_interactable(room_x, y - 1);
                }

                // South wall.
                if y + h < grid.height() - 1
                    && grid.get_tile(room_x, y + h) == Tile::Wall
                    && grid.get_tile(room_x, y + h + 1) == Tile::Floor
                    && rng.gen::<f64>() < chance
                {
                    grid.set_tile(room_x, y + h, Tile::Door);
                    grid.add_interactable(room_x, y + h);
                }
            }
        }

        for room_y in y..y + h {
            if room_y > 0 && room_y < grid.height() - 1 {
                // West wall.
                if x > 1
                    && grid.get_tile(x - 1, room_y) == Tile::Wall
                    && grid.get_tile(x - 2, room_y) == Tile::Floor
                    && rng.gen::<f64>() < chance
                {
                    grid.set_tile(x - 1, room_y, Tile::Door);
                    grid.add_interactable(x - 1, room_y);
                }

                // East wall.
                if x + w < grid.width() - 1
                    && grid.get_tile(x + w, room_y) == Tile::Wall
                    && grid.get_tile(x + w + 1, room_y) == Tile::Floor
                    && rng.gen::<f64>() < chance
                {
                    grid.set_tile(x + w, room_y, Tile::Door);
                    grid.add_interactable(x + w, room_y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generation_rng;
    use crate::nav;

    #[test]
    fn test_room_intersection() {
        let a = Room::new(1, 1, 4, 4);
        let b = Room::new(3, 3, 4, 4);
        let c = Room::new(5, 1, 4, 4);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c)); // touching edges do not intersect
    }

    #[test]
    fn test_room_center() {
        assert_eq!(Room::new(2, 2, 4, 6).center(), (4, 5));
        assert_eq!(Room::new(0, 0, 3, 3).center(), (1, 1));
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let mut grid = TileGrid::new(64, 64, 8);
        let rooms = generate_dungeon(&mut grid, &DungeonParams::default(), &mut generation_rng(Some(3)));
        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_room_interiors_are_floor() {
        let mut grid = TileGrid::new(64, 64, 8);
        let rooms = generate_dungeon(&mut grid, &DungeonParams::default(), &mut generation_rng(Some(8)));
        assert!(!rooms.is_empty());
        for room in &rooms {
            for ry in room.y..room.y + room.height {
                for rx in room.x..room.x + room.width {
                    assert_eq!(grid.get_tile(rx, ry), Tile::Floor);
                }
            }
        }
    }

    #[test]
    fn test_all_rooms_connected() {
        let mut grid = TileGrid::new(64, 64, 8);
        let rooms = generate_dungeon(&mut grid, &DungeonParams::default(), &mut generation_rng(Some(21)));
        assert!(rooms.len() >= 2, "seed expected to place several rooms");

        let first = rooms[0].center();
        for room in &rooms[1..] {
            let path = nav::find_path(
                first,
                room.center(),
                |x, y| grid.is_walkable_tile(x, y),
                10_000,
            );
            assert!(
                !path.is_empty(),
                "room at {:?} unreachable from {:?}",
                room.center(),
                first
            );
        }
    }

    #[test]
    fn test_doors_are_interactable() {
        let mut grid = TileGrid::new(64, 64, 8);
        generate_dungeon(&mut grid, &DungeonParams::default(), &mut generation_rng(Some(5)));
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.get_tile(x, y) == Tile::Door {
                    assert!(
                        grid.interactable_positions().contains(&(x, y)),
                        "door at ({}, {}) not interactable",
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_dungeon_is_seed_deterministic() {
        let mut a = TileGrid::new(64, 64, 8);
        let mut b = TileGrid::new(64, 64, 8);
        let rooms_a = generate_dungeon(&mut a, &DungeonParams::default(), &mut generation_rng(Some(77)));
        let rooms_b = generate_dungeon(&mut b, &DungeonParams::default(), &mut generation_rng(Some(77)));
        assert_eq!(rooms_a, rooms_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_grid_yields_no_rooms() {
        let mut grid = TileGrid::new(4, 4, 8);
        let rooms = generate_dungeon(
            &mut grid,
            &DungeonParams {
                room_min_size: 3,
                room_max_size: 8,
                ..Default::default()
            },
            &mut generation_rng(Some(1)),
        );
        assert!(rooms.is_empty());
        assert_eq!(grid.get_tile(0, 0), Tile::Wall);
    }
}
