//! World streaming and chunk management.
//!
//! The streamer keeps a square of chunks loaded around the player:
//! - Polled once per frame with the player's position
//! - Does nothing while the player stays inside the same chunk
//! - On a chunk-boundary crossing, recomputes the required square,
//!   unloads everything outside it, and generates what is missing
//! - Optionally spreads generation over several frames with a per-tick
//!   load budget (nearest chunks first)

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use tracing::debug;
use tundra_common::{ChunkCoord, TileCoord, WorldPosition};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::content::TileContent;
use crate::context::WorldGenerationContext;
use crate::sink::{PlacementSink, PlayerPositionProvider};

/// Streaming state for a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingState {
    /// Chunk is not loaded
    Unloaded,
    /// Chunk is required but waiting for load budget
    PendingLoad,
    /// Chunk is fully loaded
    Loaded,
}

/// What a tick did with the required set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Player stayed in the same chunk
    Idle,
    /// Player entered a new chunk (or this was the first tick)
    Recomputed,
}

/// Summary of one streamer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingReport {
    /// Whether the required set was recomputed
    pub outcome: TickOutcome,
    /// Chunk the player is in
    pub center: ChunkCoord,
    /// Chunks generated this tick, in load order
    pub loaded: Vec<ChunkCoord>,
    /// Chunks unloaded this tick
    pub unloaded: Vec<ChunkCoord>,
    /// Required chunks still waiting for load budget
    pub pending: usize,
}

impl StreamingReport {
    fn idle(center: ChunkCoord) -> Self {
        Self {
            outcome: TickOutcome::Idle,
            center,
            loaded: Vec::new(),
            unloaded: Vec::new(),
            pending: 0,
        }
    }

    /// Returns `true` if the tick changed the loaded set.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.loaded.is_empty() || !self.unloaded.is_empty()
    }
}

/// Owns the loaded chunks and keeps them in step with the player.
#[derive(Debug)]
pub struct WorldStreamer {
    /// Chebyshev radius of chunks kept loaded
    load_radius: u32,
    /// Tiles per chunk side
    chunk_size: u32,
    /// Generation budget per tick (None = unbounded)
    max_loads_per_tick: Option<usize>,
    /// Loaded chunks
    chunks: AHashMap<ChunkCoord, Chunk>,
    /// Required set for the current center
    required: AHashSet<ChunkCoord>,
    /// Required chunks not yet generated (spiral order)
    pending_loads: VecDeque<ChunkCoord>,
    /// Center at the last recompute
    last_center: Option<ChunkCoord>,
}

impl WorldStreamer {
    /// Creates a streamer with nothing loaded.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            load_radius: config.load_radius,
            chunk_size: config.chunk_size,
            max_loads_per_tick: config.max_loads_per_tick,
            chunks: AHashMap::new(),
            required: AHashSet::new(),
            pending_loads: VecDeque::new(),
            last_center: None,
        }
    }

    /// Advances streaming for the player's current position.
    pub fn tick(
        &mut self,
        ctx: &WorldGenerationContext,
        position: WorldPosition,
        sink: &mut impl PlacementSink,
    ) -> StreamingReport {
        let center = ctx.grid().chunk_at(position);
        let mut report = StreamingReport::idle(center);

        if self.last_center != Some(center) {
            self.last_center = Some(center);
            report.outcome = TickOutcome::Recomputed;
            report.unloaded = self.recalculate_streaming(center, sink);
        }

        report.loaded = self.process_loads(ctx, sink);
        report.pending = self.pending_loads.len();
        report
    }

    /// Polls `provider` and advances streaming.
    pub fn tick_with(
        &mut self,
        ctx: &WorldGenerationContext,
        provider: &impl PlayerPositionProvider,
        sink: &mut impl PlacementSink,
    ) -> StreamingReport {
        self.tick(ctx, provider.current_world_position(), sink)
    }

    /// Unloads every chunk and forgets the current center.
    ///
    /// The next tick regenerates the whole square, e.g. after a world reset.
    pub fn unload_all(&mut self, sink: &mut impl PlacementSink) -> usize {
        let count = self.chunks.len();
        for (_, chunk) in self.chunks.drain() {
            chunk.despawn(sink);
        }
        self.required.clear();
        self.pending_loads.clear();
        self.last_center = None;
        debug!(count, "unloaded all chunks");
        count
    }

    /// Rebuilds the required set around `center` and unloads the rest.
    fn recalculate_streaming(
        &mut self,
        center: ChunkCoord,
        sink: &mut impl PlacementSink,
    ) -> Vec<ChunkCoord> {
        let spiral = Self::required_chunks(center, self.load_radius);
        self.required = spiral.iter().copied().collect();

        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !self.required.contains(*coord))
            .copied()
            .collect();
        for coord in &stale {
            if let Some(chunk) = self.chunks.remove(coord) {
                chunk.despawn(sink);
            }
        }

        self.pending_loads = spiral
            .into_iter()
            .filter(|coord| !self.chunks.contains_key(coord))
            .collect();

        debug!(
            %center,
            unloaded = stale.len(),
            to_load = self.pending_loads.len(),
            "recomputed required chunks"
        );
        stale
    }

    /// Generates pending chunks within this tick's budget.
    fn process_loads(
        &mut self,
        ctx: &WorldGenerationContext,
        sink: &mut impl PlacementSink,
    ) -> Vec<ChunkCoord> {
        let budget = self.max_loads_per_tick.unwrap_or(usize::MAX);
        let mut loaded = Vec::new();

        while loaded.len() < budget {
            let Some(coord) = self.pending_loads.pop_front() else {
                break;
            };
            if self.chunks.contains_key(&coord) {
                continue;
            }
            let mut chunk = ctx.generate_chunk(coord);
            chunk.spawn(ctx.grid(), sink);
            debug!(chunk = %coord, entities = chunk.entities().len(), "loaded chunk");
            self.chunks.insert(coord, chunk);
            loaded.push(coord);
        }

        loaded
    }

    /// Square of chunks within Chebyshev distance `radius` of `center`,
    /// in spiral order from the center outward.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn required_chunks(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
        let side = 2 * radius as usize + 1;
        let mut result = Vec::with_capacity(side * side);

        result.push(center);

        for ring in 1..=radius as i32 {
            // Top edge (left to right, excluding right corner)
            for x in -ring..ring {
                result.push(center.offset(x, ring));
            }
            // Right edge (top to bottom, excluding bottom corner)
            for y in (-ring..ring).rev() {
                result.push(center.offset(ring, y + 1));
            }
            // Bottom edge (right to left, excluding left corner)
            for x in (-ring..ring).rev() {
                result.push(center.offset(x + 1, -ring));
            }
            // Left edge (bottom to top, excluding top corner)
            for y in -ring..ring {
                result.push(center.offset(-ring, y));
            }
        }

        result
    }

    /// Returns the streaming state of a chunk.
    #[must_use]
    pub fn chunk_state(&self, coord: ChunkCoord) -> StreamingState {
        if self.chunks.contains_key(&coord) {
            StreamingState::Loaded
        } else if self.pending_loads.contains(&coord) {
            StreamingState::PendingLoad
        } else {
            StreamingState::Unloaded
        }
    }

    /// Checks if a chunk is loaded.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Returns the number of loaded chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Loaded chunk coordinates, sorted.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Required chunk coordinates for the current center, sorted.
    #[must_use]
    pub fn required_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.required.iter().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// A loaded chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// All loaded chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Generated content of a tile, if its chunk is loaded.
    #[must_use]
    pub fn tile_content(&self, tile: TileCoord) -> Option<&TileContent> {
        self.chunks
            .get(&tile.to_chunk_coord(self.chunk_size))
            .and_then(|chunk| chunk.tile(tile))
    }

    /// Chunks waiting for load budget.
    #[must_use]
    pub fn pending_loads(&self) -> &VecDeque<ChunkCoord> {
        &self.pending_loads
    }

    /// Center chunk at the last recompute.
    #[must_use]
    pub const fn center(&self) -> Option<ChunkCoord> {
        self.last_center
    }

    /// Returns the load radius.
    #[must_use]
    pub const fn load_radius(&self) -> u32 {
        self.load_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streamer_creation() {
        let streamer = WorldStreamer::new(&WorldConfig::default());
        assert_eq!(streamer.load_radius(), 2);
        assert_eq!(streamer.loaded_count(), 0);
        assert_eq!(streamer.center(), None);
    }

    #[test]
    fn test_spiral_generation() {
        let center = ChunkCoord::new(0, 0);
        let spiral = WorldStreamer::required_chunks(center, 1);

        // Radius 1 spiral should have center + 8 surrounding = 9 chunks
        assert_eq!(spiral.len(), 9);
        assert_eq!(spiral[0], center);
    }

    #[test]
    fn test_required_set_is_full_square() {
        for radius in 0..5u32 {
            let center = ChunkCoord::new(-7, 3);
            let spiral = WorldStreamer::required_chunks(center, radius);
            let unique: AHashSet<_> = spiral.iter().copied().collect();
            let side = 2 * radius as usize + 1;

            assert_eq!(spiral.len(), side * side);
            assert_eq!(unique.len(), spiral.len(), "duplicates at radius {radius}");
            assert!(spiral
                .iter()
                .all(|c| c.chebyshev_distance(center) <= radius));
        }
    }

    #[test]
    fn test_spiral_is_nearest_first() {
        let center = ChunkCoord::new(2, 2);
        let spiral = WorldStreamer::required_chunks(center, 3);
        let rings: Vec<u32> = spiral.iter().map(|c| c.chebyshev_distance(center)).collect();
        assert!(rings.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_chunk_state() {
        let mut streamer = WorldStreamer::new(&WorldConfig::default());
        let coord = ChunkCoord::new(5, 5);

        assert_eq!(streamer.chunk_state(coord), StreamingState::Unloaded);

        streamer.pending_loads.push_back(coord);
        assert_eq!(streamer.chunk_state(coord), StreamingState::PendingLoad);
    }
}
