//! World configuration.
//!
//! Supplied once when the world is created and immutable for the session.
//! Every check here is fatal: a world either starts with a fully valid
//! configuration or not at all.

use serde::{Deserialize, Serialize};
use tundra_common::{ConfigError, ConfigResult, WorldGrid};

use crate::content::{ArchetypeKind, RockVariant};
use crate::water::WaterSettings;

/// Default tiles per chunk side.
pub const DEFAULT_CHUNK_SIZE: u32 = 16;

/// Default world units per tile.
pub const DEFAULT_TILE_SIZE: f32 = 1.0;

/// Default load radius in chunks.
pub const DEFAULT_LOAD_RADIUS: u32 = 2;

/// Largest accepted load radius in chunks (a 129 x 129 chunk square).
pub const MAX_LOAD_RADIUS: u32 = 64;

/// Archetype (prefab) names handed to the placement sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeConfig {
    /// Ground tile
    pub ground: String,
    /// Standing tree (stump and canopy)
    pub tree: String,
    /// Stump left behind by a chopped tree
    pub tree_stump: String,
    /// Rock type 0
    pub rock_primary: String,
    /// Rock type 1
    pub rock_secondary: String,
    /// Critter spawn point
    pub critter: String,
    /// Frozen water body
    pub water: String,
}

impl Default for ArchetypeConfig {
    fn default() -> Self {
        Self {
            ground: "GroundTile".into(),
            tree: "Tree".into(),
            tree_stump: "TreeStump".into(),
            rock_primary: "Rock1".into(),
            rock_secondary: "Rock2".into(),
            critter: "Bunny".into(),
            water: "FrozenWater".into(),
        }
    }
}

impl ArchetypeConfig {
    /// Returns the archetype name for a placement kind.
    #[must_use]
    pub fn name_for(&self, kind: ArchetypeKind) -> &str {
        match kind {
            ArchetypeKind::Ground => &self.ground,
            ArchetypeKind::Tree => &self.tree,
            ArchetypeKind::TreeStump => &self.tree_stump,
            ArchetypeKind::Rock(RockVariant::Primary) => &self.rock_primary,
            ArchetypeKind::Rock(RockVariant::Secondary) => &self.rock_secondary,
            ArchetypeKind::Critter => &self.critter,
            ArchetypeKind::Water => &self.water,
        }
    }

    /// Rejects empty archetype references.
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("ground", &self.ground),
            ("tree", &self.tree),
            ("tree_stump", &self.tree_stump),
            ("rock_primary", &self.rock_primary),
            ("rock_secondary", &self.rock_secondary),
            ("critter", &self.critter),
            ("water", &self.water),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingArchetype(name));
            }
        }
        Ok(())
    }
}

/// World generation and streaming parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tiles per chunk side
    pub chunk_size: u32,
    /// World units per tile side
    pub tile_size: f32,
    /// Chebyshev radius of chunks kept loaded around the player
    pub load_radius: u32,
    /// Chance per tile of a rock
    pub rock_spawn_chance: f32,
    /// Chance per tile of a tree
    pub tree_spawn_chance: f32,
    /// Chance per tile of a critter spawn point
    pub critter_spawn_chance: f32,
    /// Mixed into every tile stream; 0 reproduces the classic layout
    pub world_salt: u64,
    /// Maximum chunk generations per tick (None = all on the crossing tick)
    pub max_loads_per_tick: Option<usize>,
    /// Archetype names
    pub archetypes: ArchetypeConfig,
    /// Rivers and lakes
    pub water: WaterSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            load_radius: DEFAULT_LOAD_RADIUS,
            rock_spawn_chance: 0.10,
            tree_spawn_chance: 0.05,
            critter_spawn_chance: 0.02,
            world_salt: 0,
            max_loads_per_tick: None,
            archetypes: ArchetypeConfig::default(),
            water: WaterSettings::default(),
        }
    }
}

impl WorldConfig {
    /// Validates every setting and returns the grid it describes.
    pub fn validate(&self) -> ConfigResult<WorldGrid> {
        let grid = WorldGrid::new(self.chunk_size, self.tile_size)?;

        let chances = [
            ("rock_spawn_chance", self.rock_spawn_chance),
            ("tree_spawn_chance", self.tree_spawn_chance),
            ("critter_spawn_chance", self.critter_spawn_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSpawnChance { name, value });
            }
        }

        if self.load_radius > MAX_LOAD_RADIUS {
            return Err(ConfigError::InvalidLoadRadius(self.load_radius));
        }

        if self.max_loads_per_tick == Some(0) {
            return Err(ConfigError::InvalidLoadBudget);
        }

        self.archetypes.validate()?;
        self.water.validate()?;
        Ok(grid)
    }

    /// Number of chunks in the required square around the player.
    #[must_use]
    pub const fn required_chunk_count(&self) -> usize {
        let side = 2 * self.load_radius as usize + 1;
        side * side
    }
}
