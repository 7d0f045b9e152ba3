//! Save/Load for world state.
//!
//! The on-disk shape is JSON: tile codes in a row-major 2D array plus the
//! sparse metadata keyed by `"x,y"` strings. Loading validates tile codes
//! and property keys; any failure is recoverable and callers fall back to
//! procedural generation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use rand::Rng;

use crate::generation::{self, DungeonParams};
use crate::grid::{PropertyBag, Region, Tile, TileGrid};

/// Fallback world dimensions when generating in place of a missing file.
pub const DEFAULT_WORLD_WIDTH: i32 = 128;
pub const DEFAULT_WORLD_HEIGHT: i32 = 128;
pub const DEFAULT_TILE_SIZE: i32 = 8;

/// Serializable snapshot of a `TileGrid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldFile {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
    /// Row-major tile codes: one inner vec per y, one entry per x.
    pub tiles: Vec<Vec<u8>>,
    #[serde(default)]
    pub tile_properties: HashMap<String, PropertyBag>,
    #[serde(default)]
    pub regions: HashMap<String, Region>,
    #[serde(default)]
    pub interactable_positions: Vec<[i32; 2]>,
}

impl WorldFile {
    /// Snapshot a grid into its persisted form.
    pub fn from_grid(grid: &TileGrid) -> Self {
        let tiles = (0..grid.height())
            .map(|y| (0..grid.width()).map(|x| grid.get_tile(x, y).code()).collect())
            .collect();

        let tile_properties = grid
            .tile_properties()
            .iter()
            .map(|(&(x, y), bag)| (format!("{},{}", x, y), bag.clone()))
            .collect();

        let interactable_positions = grid
            .interactable_positions()
            .iter()
            .map(|&(x, y)| [x, y])
            .collect();

        Self {
            name: grid.name.clone(),
            width: grid.width(),
            height: grid.height(),
            tile_size: grid.tile_size(),
            tiles,
            tile_properties,
            regions: grid.regions().clone(),
            interactable_positions,
        }
    }

    /// Rebuild a grid, validating tile codes and property keys.
    pub fn into_grid(self) -> Result<TileGrid, WorldFileError> {
        if self.width <= 0 || self.height <= 0 || self.tiles.len() != self.height as usize {
            return Err(WorldFileError::DimensionMismatch {
                width: self.width,
                height: self.height,
                rows: self.tiles.len(),
            });
        }

        let mut grid = TileGrid::new(self.width, self.height, self.tile_size);
        grid.name = self.name;

        for (y, row) in self.tiles.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(WorldFileError::DimensionMismatch {
                    width: self.width,
                    height: self.height,
                    rows: row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code).ok_or(WorldFileError::TileCodeOutOfRange {
                    x: x as i32,
                    y: y as i32,
                    code,
                })?;
                grid.set_tile(x as i32, y as i32, tile);
            }
        }

        for (key, bag) in self.tile_properties {
            let (x, y) = parse_coord_key(&key)?;
            grid.set_properties(x, y, bag);
        }

        for (region_id, region) in self.regions {
            grid.add_region(
                region_id,
                region.name,
                region.x,
                region.y,
                region.width,
                region.height,
            );
        }

        for [x, y] in self.interactable_positions {
            grid.add_interactable(x, y);
        }

        Ok(grid)
    }
}

fn parse_coord_key(key: &str) -> Result<(i32, i32), WorldFileError> {
    let malformed = || WorldFileError::MalformedPropertyKey(key.to_string());
    let (x, y) = key.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse().map_err(|_| malformed())?;
    let y = y.trim().parse().map_err(|_| malformed())?;
    Ok((x, y))
}

/// Serialize a grid as JSON to a writer.
pub fn save_world<W: Write>(writer: W, grid: &TileGrid) -> Result<(), WorldFileError> {
    serde_json::to_writer(writer, &WorldFile::from_grid(grid))?;
    Ok(())
}

/// Load a grid from a JSON reader.
pub fn load_world<R: Read>(reader: R) -> Result<TileGrid, WorldFileError> {
    let file: WorldFile = serde_json::from_reader(reader)?;
    file.into_grid()
}

/// Save a world to `<dir>/<grid.name>.json`, creating the directory.
pub fn save_world_file(dir: &Path, grid: &TileGrid) -> Result<(), WorldFileError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", grid.name));
    let writer = BufWriter::new(File::create(path)?);
    save_world(writer, grid)
}

/// Load `<dir>/<level_name>.json`, or generate a world when the file is
/// missing or malformed. A load failure is logged and recovered, never
/// fatal.
pub fn load_or_generate(dir: &Path, level_name: &str, rng: &mut impl Rng) -> TileGrid {
    let path = dir.join(format!("{}.json", level_name));
    if path.exists() {
        let result = File::open(&path)
            .map_err(WorldFileError::from)
            .and_then(|f| load_world(BufReader::new(f)));
        match result {
            Ok(grid) => return grid,
            Err(err) => {
                log::warn!("failed to load world '{}': {}; regenerating", level_name, err);
            }
        }
    }

    generate_for_level(level_name, rng)
}

/// Procedurally generate a world for a level name: dungeon levels get the
/// room-and-corridor generator, everything else gets organic terrain.
pub fn generate_for_level(level_name: &str, rng: &mut impl Rng) -> TileGrid {
    let mut grid = TileGrid::new(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT, DEFAULT_TILE_SIZE);
    grid.name = level_name.to_string();

    if level_name.to_lowercase().contains("dungeon") {
        generation::generate_dungeon(&mut grid, &DungeonParams::default(), rng);
    } else {
        generation::generate_terrain(&mut grid, rng);
    }

    grid
}

/// Errors raised while persisting or loading world files. All of them are
/// recoverable; callers fall back to generation.
#[derive(Debug)]
pub enum WorldFileError {
    Io(std::io::Error),
    Json(serde_json::Error),
    TileCodeOutOfRange { x: i32, y: i32, code: u8 },
    MalformedPropertyKey(String),
    DimensionMismatch { width: i32, height: i32, rows: usize },
}

impl From<std::io::Error> for WorldFileError {
    fn from(e: std::io::Error) -> Self {
        WorldFileError::Io(e)
    }
}

impl From<serde_json::Error> for WorldFileError {
    fn from(e: serde_json::Error) -> Self {
        WorldFileError::Json(e)
    }
}

impl std::fmt::Display for WorldFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldFileError::Io(e) => write!(f, "IO error: {}", e),
            WorldFileError::Json(e) => write!(f, "JSON error: {}", e),
            WorldFileError::TileCodeOutOfRange { x, y, code } => {
                write!(f, "tile code {} at ({}, {}) is out of range", code, x, y)
            }
            WorldFileError::MalformedPropertyKey(key) => {
                write!(f, "malformed property key {:?} (expected \"x,y\")", key)
            }
            WorldFileError::DimensionMismatch {
                width,
                height,
                rows,
            } => {
                write!(
                    f,
                    "tile array does not match declared {}x{} dimensions (got {} entries)",
                    width, height, rows
                )
            }
        }
    }
}

impl std::error::Error for WorldFileError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generation_rng;
    use serde_json::json;

    fn sample_grid() -> TileGrid {
        let mut grid = TileGrid::new(8, 6, 8);
        grid.name = "meadow".to_string();
        grid.fill(Tile::Grass);
        grid.set_tile(3, 2, Tile::Water);
        grid.set_tile(4, 4, Tile::Door);
        let mut bag = PropertyBag::new();
        bag.insert("blocked".to_string(), json!(true));
        grid.set_properties(1, 1, bag);
        grid.add_interactable(4, 4);
        grid.add_region("spawn", "Spawn Field", 0, 0, 4, 4);
        grid
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let grid = sample_grid();

        let mut buffer = Vec::new();
        save_world(&mut buffer, &grid).expect("save failed");
        let loaded = load_world(&buffer[..]).expect("load failed");

        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_bad_tile_code_rejected() {
        let mut file = WorldFile::from_grid(&sample_grid());
        file.tiles[0][0] = 99;
        match file.into_grid() {
            Err(WorldFileError::TileCodeOutOfRange { x: 0, y: 0, code: 99 }) => {}
            other => panic!("expected TileCodeOutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_property_key_rejected() {
        let mut file = WorldFile::from_grid(&sample_grid());
        file.tile_properties
            .insert("not-a-coord".to_string(), PropertyBag::new());
        assert!(matches!(
            file.into_grid(),
            Err(WorldFileError::MalformedPropertyKey(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut file = WorldFile::from_grid(&sample_grid());
        file.tiles.pop();
        assert!(matches!(
            file.into_grid(),
            Err(WorldFileError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_metadata_dropped_on_load() {
        let mut file = WorldFile::from_grid(&sample_grid());
        file.tile_properties
            .insert("100,100".to_string(), PropertyBag::new());
        file.interactable_positions.push([-5, -5]);
        let grid = file.into_grid().expect("load failed");
        assert!(grid.properties(100, 100).is_none());
        assert!(!grid.interactable_positions().contains(&(-5, -5)));
    }

    #[test]
    fn test_generate_for_level_selects_algorithm() {
        let dungeon = generate_for_level("Old_Dungeon_3", &mut generation_rng(Some(1)));
        let overworld = generate_for_level("meadow", &mut generation_rng(Some(1)));

        let count = |grid: &TileGrid, tile: Tile| {
            let mut n = 0;
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if grid.get_tile(x, y) == tile {
                        n += 1;
                    }
                }
            }
            n
        };

        assert!(count(&dungeon, Tile::Wall) > 0);
        assert_eq!(count(&dungeon, Tile::Grass), 0);
        assert!(count(&overworld, Tile::Grass) > 0);
        assert_eq!(count(&overworld, Tile::Wall), 0);
    }

    #[test]
    fn test_load_or_generate_falls_back_on_garbage() {
        let dir = std::env::temp_dir().join("gridquest-persistence-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.json"), b"{ not json").unwrap();

        let grid = load_or_generate(&dir, "broken", &mut generation_rng(Some(2)));
        assert_eq!(grid.name, "broken");
        assert_eq!(grid.width(), DEFAULT_WORLD_WIDTH);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_generate_prefers_existing_file() {
        let dir = std::env::temp_dir().join("gridquest-persistence-test-load");
        let grid = sample_grid();
        save_world_file(&dir, &grid).expect("save failed");

        let loaded = load_or_generate(&dir, "meadow", &mut generation_rng(Some(3)));
        assert_eq!(loaded, grid);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
