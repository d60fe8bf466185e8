//! Tile content and placement records.

use serde::{Deserialize, Serialize};
use tundra_common::{TileCoord, TileSeed, WorldPosition};

/// Growth state of a generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeState {
    /// Stump and a cuttable canopy
    Standing,
    /// Stump only; the canopy was chopped earlier in the session
    Stump,
}

/// Which of the two rock archetypes a rock uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockVariant {
    /// Rock type 0
    Primary,
    /// Rock type 1
    Secondary,
}

/// Decoration generated on a tile. At most one per tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentKind {
    /// Bare ground
    #[default]
    Empty,
    /// A tree
    Tree(TreeState),
    /// A rock
    Rock(RockVariant),
    /// A critter spawn point
    Critter,
}

impl ContentKind {
    /// Returns `true` if the tile carries a decoration.
    #[must_use]
    pub const fn is_decorated(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Archetype used to instantiate this decoration, if any.
    #[must_use]
    pub const fn archetype(self) -> Option<ArchetypeKind> {
        match self {
            Self::Empty => None,
            Self::Tree(TreeState::Standing) => Some(ArchetypeKind::Tree),
            Self::Tree(TreeState::Stump) => Some(ArchetypeKind::TreeStump),
            Self::Rock(variant) => Some(ArchetypeKind::Rock(variant)),
            Self::Critter => Some(ArchetypeKind::Critter),
        }
    }
}

/// Generation result for a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileContent {
    /// Tile this content belongs to
    pub tile: TileCoord,
    /// Seed the tile's stream was derived from
    pub seed: TileSeed,
    /// Decoration decision
    pub kind: ContentKind,
    /// Decoration rotation in whole degrees `[0, 360)`
    pub rotation: u16,
}

/// Kind of entity the placement sink should instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeKind {
    /// Ground tile
    Ground,
    /// Standing tree
    Tree,
    /// Stump only
    TreeStump,
    /// Rock of the given variant
    Rock(RockVariant),
    /// Critter spawn point
    Critter,
    /// Frozen river or lake
    Water,
}

/// Instruction to instantiate one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// What to instantiate
    pub archetype: ArchetypeKind,
    /// Where to put it
    pub position: WorldPosition,
    /// Tile seed (ground uses it as a material seed)
    pub seed: TileSeed,
    /// Rotation in degrees
    pub rotation: f32,
}

impl Placement {
    /// Ground placement for a tile.
    #[must_use]
    pub const fn ground(position: WorldPosition, seed: TileSeed) -> Self {
        Self {
            archetype: ArchetypeKind::Ground,
            position,
            seed,
            rotation: 0.0,
        }
    }

    /// Placements for one tile: ground first, then its decoration if any.
    pub fn for_tile(
        content: &TileContent,
        position: WorldPosition,
    ) -> impl Iterator<Item = Self> {
        let ground = Self::ground(position, content.seed);
        let decoration = content.kind.archetype().map(|archetype| Self {
            archetype,
            position,
            seed: content.seed,
            rotation: f32::from(content.rotation),
        });
        std::iter::once(ground).chain(decoration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(kind: ContentKind) -> TileContent {
        TileContent {
            tile: TileCoord::new(1, 2),
            seed: TileCoord::new(1, 2).seed(),
            kind,
            rotation: 90,
        }
    }

    #[test]
    fn test_empty_tile_places_ground_only() {
        let placements: Vec<_> =
            Placement::for_tile(&content(ContentKind::Empty), WorldPosition::new(1.0, 2.0))
                .collect();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].archetype, ArchetypeKind::Ground);
        assert_eq!(placements[0].seed.raw(), 20_001);
    }

    #[test]
    fn test_decorated_tile_places_ground_then_decoration() {
        let placements: Vec<_> = Placement::for_tile(
            &content(ContentKind::Rock(RockVariant::Secondary)),
            WorldPosition::new(1.0, 2.0),
        )
        .collect();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].archetype, ArchetypeKind::Ground);
        assert_eq!(
            placements[1].archetype,
            ArchetypeKind::Rock(RockVariant::Secondary)
        );
        assert!((placements[1].rotation - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stump_uses_stump_archetype() {
        assert_eq!(
            ContentKind::Tree(TreeState::Stump).archetype(),
            Some(ArchetypeKind::TreeStump)
        );
        assert_eq!(
            ContentKind::Tree(TreeState::Standing).archetype(),
            Some(ArchetypeKind::Tree)
        );
        assert!(!ContentKind::Empty.is_decorated());
    }
}
