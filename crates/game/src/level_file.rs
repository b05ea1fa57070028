use std::fs;
use std::path::{Path, PathBuf};

use engine::{GridError, TileGrid, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelFileError {
    #[error("failed to read level file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("level grid is ragged: row {row} has {actual} tiles, expected {expected}")]
    RaggedGrid {
        row: usize,
        actual: usize,
        expected: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    pub position: Vec2,
    pub width: i32,
    pub height: i32,
    pub target: Vec2,
    pub speed: f32,
}

/// On-disk level definition. The grid is rows of tile ids, `-1` for empty,
/// matching the runtime tile grid layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub tile_size: i32,
    pub tiles_per_row: u32,
    #[serde(default)]
    pub tileset_sprite: Option<String>,
    pub grid: Vec<Vec<i32>>,
    pub player_spawn: Vec2,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
}

impl LevelDef {
    /// Flattens the row-of-rows grid into the runtime representation,
    /// rejecting ragged rows.
    pub fn tile_grid(&self) -> Result<TileGrid, LevelFileError> {
        let height = self.grid.len();
        if height == 0 {
            return Err(LevelFileError::EmptyGrid);
        }
        let width = self.grid[0].len();
        if width == 0 {
            return Err(LevelFileError::EmptyGrid);
        }
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != width {
                return Err(LevelFileError::RaggedGrid {
                    row,
                    actual: cells.len(),
                    expected: width,
                });
            }
            tiles.extend_from_slice(cells);
        }
        Ok(TileGrid::new(width as u32, height as u32, tiles)?)
    }
}

pub fn load_level_file(path: &Path) -> Result<LevelDef, LevelFileError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level_json(&raw)
}

fn parse_level_json(raw: &str) -> Result<LevelDef, LevelFileError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, LevelDef>(&mut deserializer) {
        Ok(def) => Ok(def),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>".to_owned()
            } else {
                path
            };
            Err(LevelFileError::Parse { path, source })
        }
    }
}
