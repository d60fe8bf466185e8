//! Procedural chunk content generation.
//!
//! Each tile is decided independently from its own seeded stream, so the
//! decision for a tile never depends on generation order, neighbouring
//! tiles, or how many times its chunk has been loaded before. The ledger
//! is the only other input: it turns previously chopped trees into stumps
//! and keeps destroyed rocks from coming back.

use tundra_common::{ChunkCoord, TileCoord, WorldGrid};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::content::{ContentKind, RockVariant, TileContent, TreeState};
use crate::ledger::ChunkModificationLedger;
use crate::noise::PermutationNoise;
use crate::rng::TileRng;
use crate::water::{generate_water_bodies, water_noise, WaterSettings};

/// Per-tile spawn probabilities, each an independent Bernoulli trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnChances {
    /// Critter spawn point (highest priority)
    pub critter: f32,
    /// Tree
    pub tree: f32,
    /// Rock (lowest priority)
    pub rock: f32,
}

impl SpawnChances {
    /// Spawn chances taken from a world configuration.
    #[must_use]
    pub const fn from_config(config: &WorldConfig) -> Self {
        Self {
            critter: config.critter_spawn_chance,
            tree: config.tree_spawn_chance,
            rock: config.rock_spawn_chance,
        }
    }
}

/// Every random value a tile consumes, drawn in a fixed order.
///
/// All draws are taken even when an earlier roll already decided the tile,
/// so the stream layout never depends on the outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRolls {
    /// Critter roll
    pub critter: f32,
    /// Tree roll
    pub tree: f32,
    /// Rock roll
    pub rock: f32,
    /// Rock variant roll (below 0.5 = primary)
    pub rock_variant: f32,
    /// Decoration rotation in degrees
    pub rotation: u16,
}

impl TileRolls {
    /// Draws the rolls for `tile` under `salt`.
    #[must_use]
    pub fn draw(tile: TileCoord, salt: u64) -> Self {
        let mut rng = TileRng::new(tile.seed(), salt);
        let critter = rng.next_f32();
        let tree = rng.next_f32();
        let rock = rng.next_f32();
        let rock_variant = rng.next_f32();
        let rotation = rng.below(360) as u16;
        Self {
            critter,
            tree,
            rock,
            rock_variant,
            rotation,
        }
    }

    /// Resolves the rolls in priority order: critter, tree, rock.
    ///
    /// The first successful roll decides the tile. A tree that hits on a
    /// tile the ledger marks as chopped comes back as a stump. A rock that
    /// hits on a tile whose rock was destroyed leaves the tile empty.
    #[must_use]
    pub fn resolve(
        &self,
        tile: TileCoord,
        chances: &SpawnChances,
        ledger: &ChunkModificationLedger,
    ) -> ContentKind {
        if self.critter < chances.critter {
            ContentKind::Critter
        } else if self.tree < chances.tree {
            if ledger.is_tree_chopped(tile) {
                ContentKind::Tree(TreeState::Stump)
            } else {
                ContentKind::Tree(TreeState::Standing)
            }
        } else if self.rock < chances.rock {
            if ledger.is_rock_destroyed(tile) {
                ContentKind::Empty
            } else if self.rock_variant < 0.5 {
                ContentKind::Rock(RockVariant::Primary)
            } else {
                ContentKind::Rock(RockVariant::Secondary)
            }
        } else {
            ContentKind::Empty
        }
    }
}

/// Deterministic per-chunk content generator.
#[derive(Debug, Clone)]
pub struct ChunkContentGenerator {
    /// Grid dimensions
    grid: WorldGrid,
    /// Spawn probabilities
    chances: SpawnChances,
    /// World salt mixed into every tile stream
    salt: u64,
    /// Water placement settings
    water: WaterSettings,
    /// Water placement noise
    water_noise: PermutationNoise,
}

impl ChunkContentGenerator {
    /// Creates a generator for an already-validated configuration.
    #[must_use]
    pub fn new(grid: WorldGrid, config: &WorldConfig) -> Self {
        Self {
            grid,
            chances: SpawnChances::from_config(config),
            salt: config.world_salt,
            water: config.water.clone(),
            water_noise: water_noise(&config.water),
        }
    }

    /// Decides the content of a single tile.
    #[must_use]
    pub fn generate_tile(&self, tile: TileCoord, ledger: &ChunkModificationLedger) -> TileContent {
        let rolls = TileRolls::draw(tile, self.salt);
        TileContent {
            tile,
            seed: tile.seed(),
            kind: rolls.resolve(tile, &self.chances, ledger),
            rotation: rolls.rotation,
        }
    }

    /// Generates a chunk at the given coordinate.
    #[must_use]
    pub fn generate_chunk(&self, coord: ChunkCoord, ledger: &ChunkModificationLedger) -> Chunk {
        let size = self.grid.chunk_size();
        let tiles = coord
            .tiles(size)
            .map(|tile| self.generate_tile(tile, ledger))
            .collect();
        let water =
            generate_water_bodies(coord, &self.grid, &self.water_noise, &self.water, self.salt);
        Chunk::new(coord, size, tiles, water)
    }

    /// Grid this generator works on.
    #[must_use]
    pub const fn grid(&self) -> &WorldGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ArchetypeKind, Placement};

    fn generator(config: &WorldConfig) -> ChunkContentGenerator {
        let grid = config.validate().expect("valid config");
        ChunkContentGenerator::new(grid, config)
    }

    fn ledger() -> ChunkModificationLedger {
        ChunkModificationLedger::new(16)
    }

    #[test]
    fn test_generation_deterministic() {
        let config = WorldConfig::default();
        let gen1 = generator(&config);
        let gen2 = generator(&config);

        let chunk1 = gen1.generate_chunk(ChunkCoord::new(0, 0), &ledger());
        let _ = gen2.generate_chunk(ChunkCoord::new(5, -2), &ledger());
        let chunk2 = gen2.generate_chunk(ChunkCoord::new(0, 0), &ledger());

        assert_eq!(chunk1.tiles(), chunk2.tiles());
    }

    #[test]
    fn test_different_salts_different_content() {
        let config = WorldConfig::default();
        let salted = WorldConfig {
            world_salt: 999,
            ..WorldConfig::default()
        };

        let chunk1 = generator(&config).generate_chunk(ChunkCoord::new(0, 0), &ledger());
        let chunk2 = generator(&salted).generate_chunk(ChunkCoord::new(0, 0), &ledger());

        assert_ne!(chunk1.tiles(), chunk2.tiles());
    }

    #[test]
    fn test_seed_stability_across_instances() {
        let tile = TileCoord::new(5, 7);
        assert_eq!(tile.seed().raw(), 70_005);

        let config = WorldConfig::default();
        let a = generator(&config).generate_tile(tile, &ledger());
        let b = generator(&config).generate_tile(tile, &ledger());
        assert_eq!(a, b);
        assert_eq!(TileRolls::draw(tile, 0), TileRolls::draw(tile, 0));
    }

    #[test]
    fn test_critter_beats_tree() {
        let chances = SpawnChances {
            critter: 0.5,
            tree: 0.5,
            rock: 0.0,
        };
        let tile = (0..10_000)
            .map(|x| TileCoord::new(x, 3))
            .find(|&t| {
                let rolls = TileRolls::draw(t, 0);
                rolls.critter < 0.5 && rolls.tree < 0.5
            })
            .expect("a tile where both rolls hit");

        let rolls = TileRolls::draw(tile, 0);
        assert_eq!(rolls.resolve(tile, &chances, &ledger()), ContentKind::Critter);

        let no_critters = SpawnChances {
            critter: 0.0,
            ..chances
        };
        assert_eq!(
            rolls.resolve(tile, &no_critters, &ledger()),
            ContentKind::Tree(TreeState::Standing)
        );
    }

    #[test]
    fn test_chopped_tree_regenerates_as_stump() {
        let config = WorldConfig {
            tree_spawn_chance: 1.0,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        };
        let gen = generator(&config);
        let tile = TileCoord::new(-4, 9);
        let mut ledger = ledger();

        assert_eq!(
            gen.generate_tile(tile, &ledger).kind,
            ContentKind::Tree(TreeState::Standing)
        );
        ledger.record_tree_chopped(tile);
        assert_eq!(
            gen.generate_tile(tile, &ledger).kind,
            ContentKind::Tree(TreeState::Stump)
        );
    }

    #[test]
    fn test_destroyed_rock_stays_gone() {
        let config = WorldConfig {
            rock_spawn_chance: 1.0,
            tree_spawn_chance: 0.0,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        };
        let gen = generator(&config);
        let tile = TileCoord::new(12, 12);
        let mut ledger = ledger();

        assert!(matches!(gen.generate_tile(tile, &ledger).kind, ContentKind::Rock(_)));
        ledger.record_rock_destroyed(tile);
        assert_eq!(gen.generate_tile(tile, &ledger).kind, ContentKind::Empty);
    }

    #[test]
    fn test_ledger_does_not_shift_other_tiles() {
        let config = WorldConfig::default();
        let gen = generator(&config);
        let coord = ChunkCoord::new(2, 2);
        let before = gen.generate_chunk(coord, &ledger());

        let mut ledger = ledger();
        let victim = before
            .decorations()
            .find(|t| matches!(t.kind, ContentKind::Rock(_)))
            .map(|t| t.tile);
        if let Some(tile) = victim {
            ledger.record_rock_destroyed(tile);
        }
        let after = gen.generate_chunk(coord, &ledger);

        for (a, b) in before.tiles().iter().zip(after.tiles()) {
            if Some(a.tile) != victim {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_both_rock_variants_occur() {
        let config = WorldConfig {
            rock_spawn_chance: 1.0,
            tree_spawn_chance: 0.0,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        };
        let chunk = generator(&config).generate_chunk(ChunkCoord::new(0, 0), &ledger());
        let primary = chunk.count_where(|k| k == ContentKind::Rock(RockVariant::Primary));
        let secondary = chunk.count_where(|k| k == ContentKind::Rock(RockVariant::Secondary));
        assert_eq!(primary + secondary, 256);
        assert!(primary > 64 && secondary > 64);
    }

    #[test]
    fn test_at_most_one_decoration_per_tile() {
        let config = WorldConfig {
            rock_spawn_chance: 0.6,
            tree_spawn_chance: 0.6,
            critter_spawn_chance: 0.6,
            ..WorldConfig::default()
        };
        let gen = generator(&config);
        let chunk = gen.generate_chunk(ChunkCoord::new(3, -3), &ledger());

        for content in chunk.tiles() {
            let position = gen.grid().tile_position(content.tile);
            let decorations = Placement::for_tile(content, position)
                .filter(|p| p.archetype != ArchetypeKind::Ground)
                .count();
            assert!(decorations <= 1);
        }
        assert!(chunk.count_where(|k| k == ContentKind::Critter) > 0);
        assert!(chunk.count_where(|k| matches!(k, ContentKind::Tree(_))) > 0);
        assert!(chunk.count_where(|k| matches!(k, ContentKind::Rock(_))) > 0);
    }

    #[test]
    fn test_zero_chances_leave_ground_only() {
        let config = WorldConfig {
            rock_spawn_chance: 0.0,
            tree_spawn_chance: 0.0,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        };
        let chunk = generator(&config).generate_chunk(ChunkCoord::new(-1, 4), &ledger());
        assert_eq!(chunk.decorations().count(), 0);
        assert_eq!(chunk.tiles().len(), 256);
    }
}
