//! Tile grid - the world data model.
//!
//! `TileGrid` owns the rectangular tile array plus the sparse per-cell
//! metadata layered on top of it: property bags, named regions, and the
//! set of interactable positions. Every read is bounds-safe: out-of-range
//! queries return a neutral default instead of erroring.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Free-form per-cell metadata, e.g. `{"blocked": true}`.
pub type PropertyBag = HashMap<String, Value>;

/// Terrain unit at a grid cell. Stored by value in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    Empty = 0,
    Floor = 1,
    Wall = 2,
    Door = 3,
    Water = 4,
    Grass = 5,
    Path = 6,
    Tree = 7,
    Rock = 8,
    Bridge = 9,
}

impl Tile {
    /// Decode a persisted tile code. Returns `None` for codes outside the
    /// defined range.
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Floor),
            2 => Some(Tile::Wall),
            3 => Some(Tile::Door),
            4 => Some(Tile::Water),
            5 => Some(Tile::Grass),
            6 => Some(Tile::Path),
            7 => Some(Tile::Tree),
            8 => Some(Tile::Rock),
            9 => Some(Tile::Bridge),
            _ => None,
        }
    }

    /// Persisted integer code for this tile.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether this tile category permits movement before per-cell
    /// overrides are applied.
    pub fn is_base_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Grass | Tile::Path | Tile::Bridge)
    }

    /// Whether this tile blocks line of sight for field-of-view queries.
    pub fn blocks_sight(self) -> bool {
        matches!(self, Tile::Wall | Tile::Tree | Tile::Rock)
    }
}

/// Named rectangular metadata area. Regions may overlap; they carry no
/// gameplay-blocking semantics of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The world grid: tiles plus sparse per-cell metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub name: String,
    width: i32,
    height: i32,
    tile_size: i32,
    /// Row-major tile storage: index = y * width + x.
    tiles: Vec<Tile>,
    tile_properties: HashMap<(i32, i32), PropertyBag>,
    regions: HashMap<String, Region>,
    interactable_positions: HashSet<(i32, i32)>,
}

impl TileGrid {
    /// Create a grid filled with `Tile::Empty`.
    pub fn new(width: i32, height: i32, tile_size: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            name: "World".to_string(),
            width,
            height,
            tile_size: tile_size.max(1),
            tiles: vec![Tile::Empty; (width * height) as usize],
            tile_properties: HashMap::new(),
            regions: HashMap::new(),
            interactable_positions: HashSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at `(x, y)`, or `Tile::Empty` when out of bounds.
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize]
        } else {
            Tile::Empty
        }
    }

    /// Set the tile at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize] = tile;
        }
    }

    /// Fill every cell with the same tile.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Property bag for a cell, if one has been set.
    pub fn properties(&self, x: i32, y: i32) -> Option<&PropertyBag> {
        self.tile_properties.get(&(x, y))
    }

    /// Attach a property bag to a cell. Out-of-bounds writes are ignored
    /// so the property map only ever holds in-bounds coordinates.
    pub fn set_properties(&mut self, x: i32, y: i32, bag: PropertyBag) {
        if self.in_bounds(x, y) {
            self.tile_properties.insert((x, y), bag);
        }
    }

    /// Walkability at tile granularity: the tile category must permit
    /// movement and the cell must not carry a `blocked: true` override.
    /// Overrides only restrict; they never grant walkability.
    pub fn is_walkable_tile(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if !self.get_tile(x, y).is_base_walkable() {
            return false;
        }
        !self.is_blocked_by_properties(x, y)
    }

    fn is_blocked_by_properties(&self, x: i32, y: i32) -> bool {
        self.tile_properties
            .get(&(x, y))
            .and_then(|bag| bag.get("blocked"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Walkability at world (pixel) granularity. Converts to tile
    /// coordinates by floor division so negative positions land outside
    /// the grid rather than wrapping.
    pub fn is_walkable_world(&self, px: i32, py: i32) -> bool {
        let tx = px.div_euclid(self.tile_size);
        let ty = py.div_euclid(self.tile_size);
        self.is_walkable_tile(tx, ty)
    }

    /// Whether the tile under a world position is flagged interactable.
    pub fn is_interactable_world(&self, px: i32, py: i32) -> bool {
        let tx = px.div_euclid(self.tile_size);
        let ty = py.div_euclid(self.tile_size);
        self.interactable_positions.contains(&(tx, ty))
    }

    /// Mark a tile position interactable. Out-of-bounds positions are
    /// ignored, keeping the set within the grid.
    pub fn add_interactable(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.interactable_positions.insert((x, y));
        }
    }

    pub fn remove_interactable(&mut self, x: i32, y: i32) {
        self.interactable_positions.remove(&(x, y));
    }

    pub fn interactable_positions(&self) -> &HashSet<(i32, i32)> {
        &self.interactable_positions
    }

    /// Register a named region. Regions may overlap.
    pub fn add_region(
        &mut self,
        region_id: impl Into<String>,
        name: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.regions.insert(
            region_id.into(),
            Region {
                name: name.into(),
                x,
                y,
                width,
                height,
            },
        );
    }

    pub fn region(&self, region_id: &str) -> Option<&Region> {
        self.regions.get(region_id)
    }

    pub fn regions(&self) -> &HashMap<String, Region> {
        &self.regions
    }

    pub fn tile_properties(&self) -> &HashMap<(i32, i32), PropertyBag> {
        &self.tile_properties
    }
}
