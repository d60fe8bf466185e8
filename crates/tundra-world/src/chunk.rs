//! Generated chunk data.

use glam::Vec2;
use tracing::trace;
use tundra_common::{ChunkCoord, EntityId, LocalCoord, TileCoord, WorldGrid};

use crate::content::{ContentKind, Placement, TileContent};
use crate::sink::PlacementSink;
use crate::water::WaterBody;

/// A chunk of the world: its generated tiles, water, and the entities
/// spawned for them.
///
/// Chunks carry no cross-chunk state. Unloading a chunk despawns exactly
/// the entities it spawned.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk coordinate
    coord: ChunkCoord,
    /// Tiles per side
    size: u32,
    /// Tile contents (size × size, row-major)
    tiles: Vec<TileContent>,
    /// Rivers and lakes sourced in this chunk
    water: Vec<WaterBody>,
    /// Entities spawned for this chunk
    entities: Vec<EntityId>,
}

impl Chunk {
    /// Creates a chunk from generated contents.
    ///
    /// `tiles` must hold `size * size` entries in row-major order.
    #[must_use]
    pub fn new(
        coord: ChunkCoord,
        size: u32,
        tiles: Vec<TileContent>,
        water: Vec<WaterBody>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), size as usize * size as usize);
        Self {
            coord,
            size,
            tiles,
            water,
            entities: Vec::new(),
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the chunk size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns a slice of all tile contents.
    #[must_use]
    pub fn tiles(&self) -> &[TileContent] {
        &self.tiles
    }

    /// Gets tile content at local coordinates.
    #[must_use]
    pub fn get_tile(&self, x: u32, y: u32) -> Option<&TileContent> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let index = (y * self.size + x) as usize;
        self.tiles.get(index)
    }

    /// Gets tile content by world tile coordinate, if the tile is in this chunk.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Option<&TileContent> {
        if tile.to_chunk_coord(self.size) != self.coord {
            return None;
        }
        let local: LocalCoord = tile.to_local_coord(self.size);
        self.tiles.get(local.to_index(self.size))
    }

    /// Tiles carrying a decoration.
    pub fn decorations(&self) -> impl Iterator<Item = &TileContent> {
        self.tiles.iter().filter(|t| t.kind.is_decorated())
    }

    /// Number of tiles whose content matches `predicate`.
    pub fn count_where(&self, predicate: impl Fn(ContentKind) -> bool) -> usize {
        self.tiles.iter().filter(|t| predicate(t.kind)).count()
    }

    /// Rivers and lakes sourced in this chunk.
    #[must_use]
    pub fn water(&self) -> &[WaterBody] {
        &self.water
    }

    /// Returns `true` if any of this chunk's water covers `point`.
    #[must_use]
    pub fn is_water(&self, point: Vec2) -> bool {
        self.water.iter().any(|body| body.contains_point(point))
    }

    /// Entities spawned for this chunk.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Placements for every tile: ground first, then the tile's decoration.
    pub fn placements<'a>(&'a self, grid: &'a WorldGrid) -> impl Iterator<Item = Placement> + 'a {
        self.tiles
            .iter()
            .flat_map(move |content| Placement::for_tile(content, grid.tile_position(content.tile)))
    }

    /// Instantiates every placement and water body through `sink`.
    pub fn spawn(&mut self, grid: &WorldGrid, sink: &mut impl PlacementSink) {
        let coord = self.coord;
        let mut entities = Vec::with_capacity(self.tiles.len() + self.water.len());
        entities.extend(self.placements(grid).map(|p| sink.spawn(coord, &p)));
        entities.extend(self.water.iter().map(|body| sink.spawn_water(coord, body)));
        trace!(chunk = %coord, entities = entities.len(), "spawned chunk entities");
        self.entities = entities;
    }

    /// Frees every entity this chunk spawned.
    pub fn despawn(mut self, sink: &mut impl PlacementSink) {
        for entity in self.entities.drain(..) {
            sink.despawn(entity);
        }
    }
}
