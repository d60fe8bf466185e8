//! Coordinate types for world, tile, chunk, and local positions.
//!
//! The world is a grid of square tiles `tile_size` world units wide,
//! grouped into square chunks of `chunk_size` tiles per side. All integer
//! conversions use floor / Euclidean division so negative coordinates map
//! to the correct cell.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Multiplier applied to the tile Y coordinate when deriving a tile seed.
pub const TILE_SEED_ROW_STRIDE: i64 = 10_000;

/// Continuous position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    /// X coordinate in world units
    pub x: f32,
    /// Y coordinate in world units
    pub y: f32,
}

impl WorldPosition {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position as a `glam` vector.
    #[must_use]
    pub const fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }
}

impl From<Vec2> for WorldPosition {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<WorldPosition> for Vec2 {
    fn from(p: WorldPosition) -> Self {
        p.as_vec2()
    }
}

/// Deterministic per-tile seed.
///
/// `seed = x + y * 10000`. Computed in `i64` so no `i32` tile coordinate can
/// overflow it, but distinct tiles collide once `|x| >= 10000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileSeed(i64);

impl TileSeed {
    /// Creates a seed from a raw value.
    #[must_use]
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw seed value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TileSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tile coordinate (identifies one grid cell in the world).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// X coordinate in tile space
    pub x: i32,
    /// Y coordinate in tile space
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile containing a world position.
    #[must_use]
    pub fn from_world(position: WorldPosition, tile_size: f32) -> Self {
        Self {
            x: (position.x / tile_size).floor() as i32,
            y: (position.y / tile_size).floor() as i32,
        }
    }

    /// World position of the tile's placement anchor (its minimum corner).
    #[must_use]
    pub fn to_world(self, tile_size: f32) -> WorldPosition {
        WorldPosition::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// Returns the chunk this tile belongs to.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_chunk_coord(self, chunk_size: u32) -> ChunkCoord {
        let size = chunk_size as i32;
        ChunkCoord {
            x: self.x.div_euclid(size),
            y: self.y.div_euclid(size),
        }
    }

    /// Returns the position of this tile inside its chunk.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_local_coord(self, chunk_size: u32) -> LocalCoord {
        let size = chunk_size as i32;
        LocalCoord {
            x: self.x.rem_euclid(size) as u16,
            y: self.y.rem_euclid(size) as u16,
        }
    }

    /// Derives the deterministic generation seed for this tile.
    #[must_use]
    pub const fn seed(self) -> TileSeed {
        TileSeed(self.x as i64 + self.y as i64 * TILE_SEED_ROW_STRIDE)
    }

    /// Chebyshev distance to another tile.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the chunk offset by `(dx, dy)`.
    ///
    /// Wraps at the `i32` edge of the grid instead of overflowing.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Chebyshev (square ring) distance to another chunk.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Returns the first tile (minimum corner) of this chunk.
    ///
    /// Chunks whose tiles lie past the `i32` range wrap around; their
    /// content is still generated, just from wrapped tile seeds.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn origin_tile(self, chunk_size: u32) -> TileCoord {
        let size = chunk_size as i32;
        TileCoord::new(self.x.wrapping_mul(size), self.y.wrapping_mul(size))
    }

    /// Returns the world tile at a local position inside this chunk.
    #[must_use]
    pub const fn tile_at(self, local: LocalCoord, chunk_size: u32) -> TileCoord {
        let origin = self.origin_tile(chunk_size);
        TileCoord::new(
            origin.x.wrapping_add(local.x as i32),
            origin.y.wrapping_add(local.y as i32),
        )
    }

    /// Iterates the chunk's tiles row by row (`y` outer, `x` inner).
    pub fn tiles(self, chunk_size: u32) -> impl Iterator<Item = TileCoord> {
        let count = chunk_size as usize * chunk_size as usize;
        (0..count).map(move |index| {
            self.tile_at(LocalCoord::from_index(index, chunk_size), chunk_size)
        })
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Local coordinate within a chunk (0 to chunk_size-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalCoord {
    /// X coordinate within chunk
    pub x: u16,
    /// Y coordinate within chunk
    pub y: u16,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Converts to linear index for array access.
    #[must_use]
    pub const fn to_index(self, chunk_size: u32) -> usize {
        (self.y as usize) * (chunk_size as usize) + (self.x as usize)
    }

    /// Creates from linear index.
    #[must_use]
    pub const fn from_index(index: usize, chunk_size: u32) -> Self {
        let size = chunk_size as usize;
        Self {
            x: (index % size) as u16,
            y: (index / size) as u16,
        }
    }
}

/// Grid dimensions shared by every coordinate conversion in a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldGrid {
    chunk_size: u32,
    tile_size: f32,
}

impl WorldGrid {
    /// Largest supported chunk side, bounded by [`LocalCoord`]'s `u16` fields.
    pub const MAX_CHUNK_SIZE: u32 = u16::MAX as u32;

    /// Creates a grid, rejecting non-positive dimensions.
    pub fn new(chunk_size: u32, tile_size: f32) -> Result<Self, ConfigError> {
        if chunk_size == 0 || chunk_size > Self::MAX_CHUNK_SIZE {
            return Err(ConfigError::InvalidChunkSize(chunk_size));
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            chunk_size,
            tile_size,
        })
    }

    /// Tiles per chunk side.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// World units per tile side.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World units per chunk side.
    #[must_use]
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_size as f32 * self.tile_size
    }

    /// Number of tiles in one chunk.
    #[must_use]
    pub const fn tiles_per_chunk(&self) -> usize {
        self.chunk_size as usize * self.chunk_size as usize
    }

    /// Tile containing a world position.
    #[must_use]
    pub fn tile_at(&self, position: WorldPosition) -> TileCoord {
        TileCoord::from_world(position, self.tile_size)
    }

    /// Chunk containing a world position.
    #[must_use]
    pub fn chunk_at(&self, position: WorldPosition) -> ChunkCoord {
        let span = self.chunk_world_size();
        ChunkCoord::new(
            (position.x / span).floor() as i32,
            (position.y / span).floor() as i32,
        )
    }

    /// Chunk owning a tile.
    #[must_use]
    pub const fn chunk_of(&self, tile: TileCoord) -> ChunkCoord {
        tile.to_chunk_coord(self.chunk_size)
    }

    /// World position of a tile's anchor.
    #[must_use]
    pub fn tile_position(&self, tile: TileCoord) -> WorldPosition {
        tile.to_world(self.tile_size)
    }

    /// World position of a chunk's minimum corner.
    #[must_use]
    pub fn chunk_origin(&self, chunk: ChunkCoord) -> WorldPosition {
        self.tile_position(chunk.origin_tile(self.chunk_size))
    }
}
