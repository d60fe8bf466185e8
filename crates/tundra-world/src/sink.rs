//! Boundaries to the collaborators outside world generation.
//!
//! The world never renders anything itself. It hands [`Placement`]s to a
//! [`PlacementSink`], which instantiates whatever the host uses for entities
//! and returns an [`EntityId`] the owning chunk keeps until it unloads.

use ahash::AHashMap;
use tundra_common::{ChunkCoord, EntityId, EntityIdAllocator, WorldPosition};

use crate::config::ArchetypeConfig;
use crate::content::{ArchetypeKind, Placement};
use crate::water::WaterBody;

/// Instantiates and destroys the entities generated content describes.
pub trait PlacementSink {
    /// Instantiates a ground tile or decoration.
    fn spawn(&mut self, chunk: ChunkCoord, placement: &Placement) -> EntityId;

    /// Instantiates a river or lake.
    fn spawn_water(&mut self, chunk: ChunkCoord, body: &WaterBody) -> EntityId;

    /// Destroys an entity previously returned by `spawn` or `spawn_water`.
    fn despawn(&mut self, entity: EntityId);
}

/// Source of the player's position, polled once per frame.
pub trait PlayerPositionProvider {
    /// Current position of the player in world space.
    fn current_world_position(&self) -> WorldPosition;
}

impl PlayerPositionProvider for WorldPosition {
    fn current_world_position(&self) -> WorldPosition {
        *self
    }
}

/// Entity tracked by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEntity {
    /// Chunk that spawned it
    pub chunk: ChunkCoord,
    /// What it is
    pub archetype: ArchetypeKind,
    /// Archetype name it was instantiated from
    pub name: String,
    /// Where it is
    pub position: WorldPosition,
}

/// In-memory sink that keeps a table of live entities.
///
/// Used by headless hosts and tests in place of a scene graph.
#[derive(Debug, Default)]
pub struct RecordingSink {
    archetypes: ArchetypeConfig,
    ids: EntityIdAllocator,
    live: AHashMap<EntityId, RecordedEntity>,
    spawned: u64,
    despawned: u64,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink that resolves names through `archetypes`.
    #[must_use]
    pub fn with_archetypes(archetypes: ArchetypeConfig) -> Self {
        Self {
            archetypes,
            ..Self::default()
        }
    }

    /// Number of entities currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total spawns since creation.
    #[must_use]
    pub const fn total_spawned(&self) -> u64 {
        self.spawned
    }

    /// Total despawns since creation.
    #[must_use]
    pub const fn total_despawned(&self) -> u64 {
        self.despawned
    }

    /// Live entity by ID.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&RecordedEntity> {
        self.live.get(&entity)
    }

    /// Number of live entities of one archetype.
    #[must_use]
    pub fn live_of(&self, archetype: ArchetypeKind) -> usize {
        self.live.values().filter(|e| e.archetype == archetype).count()
    }

    /// Number of live entities instantiated from the archetype `name`.
    #[must_use]
    pub fn live_named(&self, name: &str) -> usize {
        self.live.values().filter(|e| e.name == name).count()
    }

    /// Number of live entities spawned by `chunk`.
    #[must_use]
    pub fn live_in(&self, chunk: ChunkCoord) -> usize {
        self.live.values().filter(|e| e.chunk == chunk).count()
    }

    fn insert(
        &mut self,
        chunk: ChunkCoord,
        archetype: ArchetypeKind,
        position: WorldPosition,
    ) -> EntityId {
        let id = self.ids.allocate();
        let name = self.archetypes.name_for(archetype).to_owned();
        self.live.insert(
            id,
            RecordedEntity {
                chunk,
                archetype,
                name,
                position,
            },
        );
        self.spawned += 1;
        id
    }
}

impl PlacementSink for RecordingSink {
    fn spawn(&mut self, chunk: ChunkCoord, placement: &Placement) -> EntityId {
        self.insert(chunk, placement.archetype, placement.position)
    }

    fn spawn_water(&mut self, chunk: ChunkCoord, body: &WaterBody) -> EntityId {
        self.insert(chunk, ArchetypeKind::Water, body.anchor())
    }

    fn despawn(&mut self, entity: EntityId) {
        if self.live.remove(&entity).is_some() {
            self.despawned += 1;
        }
    }
}
