//! Shared world generation state.

use tracing::info;
use tundra_common::{ChunkCoord, ConfigResult, TileCoord, WorldGrid};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::generation::ChunkContentGenerator;
use crate::ledger::ChunkModificationLedger;

/// Everything chunk generation reads, owned in one place.
///
/// Built once per session from a validated [`WorldConfig`] and passed by
/// reference to the streamer. Destructive gameplay events write to the
/// ledger through this context; generation reads it.
#[derive(Debug)]
pub struct WorldGenerationContext {
    config: WorldConfig,
    grid: WorldGrid,
    generator: ChunkContentGenerator,
    ledger: ChunkModificationLedger,
}

impl WorldGenerationContext {
    /// Validates `config` and builds the context.
    ///
    /// Any configuration error is fatal; nothing is generated.
    pub fn new(config: WorldConfig) -> ConfigResult<Self> {
        let grid = config.validate()?;
        let generator = ChunkContentGenerator::new(grid, &config);
        let ledger = ChunkModificationLedger::new(grid.chunk_size());

        info!(
            chunk_size = grid.chunk_size(),
            tile_size = grid.tile_size(),
            load_radius = config.load_radius,
            salt = config.world_salt,
            water = config.water.enabled,
            "world generation context ready"
        );

        Ok(Self {
            config,
            grid,
            generator,
            ledger,
        })
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Modification ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ChunkModificationLedger {
        &self.ledger
    }

    /// Generates a chunk against the current ledger.
    #[must_use]
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        self.generator.generate_chunk(coord, &self.ledger)
    }

    /// Records a fully chopped tree. Returns `true` if newly recorded.
    pub fn record_tree_chopped(&mut self, tile: TileCoord) -> bool {
        self.ledger.record_tree_chopped(tile)
    }

    /// Records a destroyed rock. Returns `true` if newly recorded.
    pub fn record_rock_destroyed(&mut self, tile: TileCoord) -> bool {
        self.ledger.record_rock_destroyed(tile)
    }

    /// Returns `true` if the tree on `tile` has been chopped.
    #[must_use]
    pub fn is_tree_chopped(&self, tile: TileCoord) -> bool {
        self.ledger.is_tree_chopped(tile)
    }

    /// Returns `true` if the rock on `tile` has been destroyed.
    #[must_use]
    pub fn is_rock_destroyed(&self, tile: TileCoord) -> bool {
        self.ledger.is_rock_destroyed(tile)
    }

    /// Starts a new game on the same configuration.
    pub fn reset(&mut self) {
        info!(
            modifications = self.ledger.modification_count(),
            "resetting world"
        );
        self.ledger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentKind, TreeState};
    use tundra_common::ConfigError;

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = WorldConfig {
            chunk_size: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            WorldGenerationContext::new(config),
            Err(ConfigError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_records_flow_into_generation() {
        let mut ctx = WorldGenerationContext::new(WorldConfig {
            tree_spawn_chance: 1.0,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        })
        .expect("valid config");

        let tile = TileCoord::new(17, 3);
        assert!(ctx.record_tree_chopped(tile));
        assert!(ctx.is_tree_chopped(tile));

        let chunk = ctx.generate_chunk(ctx.grid().chunk_of(tile));
        assert_eq!(
            chunk.tile(tile).map(|t| t.kind),
            Some(ContentKind::Tree(TreeState::Stump))
        );

        ctx.reset();
        assert!(!ctx.is_tree_chopped(tile));
        let chunk = ctx.generate_chunk(ctx.grid().chunk_of(tile));
        assert_eq!(
            chunk.tile(tile).map(|t| t.kind),
            Some(ContentKind::Tree(TreeState::Standing))
        );
    }
}
