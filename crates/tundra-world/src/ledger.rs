//! Sparse record of destructive player actions.
//!
//! Generated content is never stored; it is regenerated from tile seeds
//! whenever a chunk loads. The ledger is the overlay that remembers what
//! the player removed, so a chunk that is unloaded and later reloaded comes
//! back exactly as the player left it.
//!
//! Entries are created lazily on the first action in a chunk and are kept
//! for the rest of the session, whether or not the chunk is loaded. Only a
//! full world reset clears them.

use ahash::{AHashMap, AHashSet};
use tracing::{debug, trace};
use tundra_common::{ChunkCoord, TileCoord};

/// Modifications recorded for a single chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkLedgerEntry {
    /// Tiles whose tree canopy was chopped
    pub chopped_trees: AHashSet<TileCoord>,
    /// Tiles whose rock was destroyed
    pub destroyed_rocks: AHashSet<TileCoord>,
}

impl ChunkLedgerEntry {
    /// Total number of recorded modifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chopped_trees.len() + self.destroyed_rocks.len()
    }

    /// Returns `true` if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-chunk modification overlay keyed by [`ChunkCoord`].
#[derive(Debug, Clone)]
pub struct ChunkModificationLedger {
    /// Tiles per chunk side, used to find a tile's owning chunk
    chunk_size: u32,
    /// Entries for chunks that have seen at least one action
    entries: AHashMap<ChunkCoord, ChunkLedgerEntry>,
}

impl ChunkModificationLedger {
    /// Creates an empty ledger for a grid with `chunk_size` tiles per side.
    #[must_use]
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_size,
            entries: AHashMap::new(),
        }
    }

    /// Records that the tree on `tile` was chopped down.
    ///
    /// Returns `true` if this is the first record for the tile.
    pub fn record_tree_chopped(&mut self, tile: TileCoord) -> bool {
        let inserted = self.entry_mut(tile).chopped_trees.insert(tile);
        trace!(x = tile.x, y = tile.y, inserted, "tree chopped");
        inserted
    }

    /// Records that the rock on `tile` was destroyed.
    ///
    /// Returns `true` if this is the first record for the tile.
    pub fn record_rock_destroyed(&mut self, tile: TileCoord) -> bool {
        let inserted = self.entry_mut(tile).destroyed_rocks.insert(tile);
        trace!(x = tile.x, y = tile.y, inserted, "rock destroyed");
        inserted
    }

    /// Returns `true` if the tree on `tile` has been chopped.
    #[must_use]
    pub fn is_tree_chopped(&self, tile: TileCoord) -> bool {
        self.entry_for_tile(tile)
            .is_some_and(|entry| entry.chopped_trees.contains(&tile))
    }

    /// Returns `true` if the rock on `tile` has been destroyed.
    #[must_use]
    pub fn is_rock_destroyed(&self, tile: TileCoord) -> bool {
        self.entry_for_tile(tile)
            .is_some_and(|entry| entry.destroyed_rocks.contains(&tile))
    }

    /// Returns the entry for a chunk, if any action was recorded there.
    #[must_use]
    pub fn entry(&self, chunk: ChunkCoord) -> Option<&ChunkLedgerEntry> {
        self.entries.get(&chunk)
    }

    /// Number of chunks with at least one recorded action.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of recorded actions across all chunks.
    #[must_use]
    pub fn modification_count(&self) -> usize {
        self.entries.values().map(ChunkLedgerEntry::len).sum()
    }

    /// Forgets everything (new game / full world reset).
    pub fn clear(&mut self) {
        debug!(chunks = self.entries.len(), "clearing modification ledger");
        self.entries.clear();
    }

    fn entry_for_tile(&self, tile: TileCoord) -> Option<&ChunkLedgerEntry> {
        self.entries.get(&tile.to_chunk_coord(self.chunk_size))
    }

    fn entry_mut(&mut self, tile: TileCoord) -> &mut ChunkLedgerEntry {
        let chunk = tile.to_chunk_coord(self.chunk_size);
        self.entries.entry(chunk).or_insert_with(|| {
            debug!(%chunk, "creating ledger entry");
            ChunkLedgerEntry::default()
        })
    }
}
