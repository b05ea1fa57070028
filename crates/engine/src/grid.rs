use thiserror::Error;
use tracing::debug;

use crate::geometry::{GeometryError, Rect, Vec2};
use crate::level::{Level, SolidId};
use crate::render::{RenderableDesc, RenderableKind};
use crate::solid::Solid;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile count {actual} does not match {width}x{height} grid")]
    TileCountMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("tile size must be positive, got {0}")]
    NonPositiveTileSize(i32),
    #[error("tileset must have at least one column")]
    EmptyTilesetRow,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Row-major grid of tile indices. `-1` marks an empty cell; any other
/// value is an index into a tileset image.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<i32>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tiles: Vec<i32>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(GridError::TileCountMismatch {
                width,
                height,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile(&self, col: u32, row: u32) -> Option<i32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get((row * self.width + col) as usize).copied()
    }
}

/// How tile indices map into a tileset image laid out in rows.
#[derive(Debug, Clone)]
pub struct TilesetLayout {
    pub sprite_key: String,
    pub columns: u32,
}

/// Instantiates one collidable solid per non-empty grid cell. Cell
/// `(col, row)` lands at `(col * tile_size, row * tile_size)` with a
/// `tile_size` square footprint.
pub fn populate_level(
    level: &mut Level,
    grid: &TileGrid,
    tile_size: i32,
    tileset: Option<&TilesetLayout>,
) -> Result<Vec<SolidId>, GridError> {
    if tile_size <= 0 {
        return Err(GridError::NonPositiveTileSize(tile_size));
    }
    if let Some(layout) = tileset {
        if layout.columns == 0 {
            return Err(GridError::EmptyTilesetRow);
        }
    }

    let mut ids = Vec::new();
    for row in 0..grid.height {
        for col in 0..grid.width {
            let tile_id = grid.tiles[(row * grid.width + col) as usize];
            if tile_id < 0 {
                continue;
            }
            let position = Vec2::new((col * tile_size as u32) as f32, (row * tile_size as u32) as f32);
            let mut solid = Solid::new(position, tile_size, tile_size)?;
            solid.renderable = Some(match tileset {
                Some(layout) => {
                    let tile_col = tile_id as u32 % layout.columns;
                    let tile_row = tile_id as u32 / layout.columns;
                    RenderableDesc {
                        kind: RenderableKind::Sprite(layout.sprite_key.clone()),
                        source_rect: Some(Rect::new(
                            (tile_col * tile_size as u32) as i32,
                            (tile_row * tile_size as u32) as i32,
                            tile_size,
                            tile_size,
                        )?),
                        debug_name: "tile",
                    }
                }
                None => RenderableDesc {
                    kind: RenderableKind::Placeholder,
                    source_rect: None,
                    debug_name: "tile",
                },
            });
            ids.push(level.add_solid(solid));
        }
    }
    debug!(solids = ids.len(), "populated level from tile grid");
    Ok(ids)
}
