//! # Tundra World
//!
//! Deterministic world generation and streaming for Tundra.
//!
//! This crate handles:
//! - Per-tile content decisions (trees, rocks, critters) from seeded streams
//! - Frozen rivers and lakes placed from coherent noise
//! - The session ledger of chopped trees and destroyed rocks
//! - Chunk loading/unloading around the player
//!
//! Rendering is out of scope: generated content leaves the crate as
//! [`Placement`]s handed to a [`PlacementSink`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod config;
pub mod content;
pub mod context;
pub mod generation;
pub mod ledger;
pub mod noise;
pub mod rng;
pub mod sink;
pub mod streaming;
pub mod water;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::*;
    pub use crate::config::*;
    pub use crate::content::*;
    pub use crate::context::*;
    pub use crate::generation::*;
    pub use crate::ledger::*;
    pub use crate::noise::{NoiseKind, PermutationNoise};
    pub use crate::rng::*;
    pub use crate::sink::*;
    pub use crate::streaming::*;
    pub use crate::water::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use tundra_common::{ChunkCoord, WorldPosition};

    #[test]
    fn test_streamer_loads_required_square() {
        let ctx = WorldGenerationContext::new(WorldConfig::default()).expect("valid config");
        let mut streamer = WorldStreamer::new(ctx.config());
        let mut sink = RecordingSink::new();

        let report = streamer.tick(&ctx, WorldPosition::ORIGIN, &mut sink);
        assert_eq!(report.outcome, TickOutcome::Recomputed);
        assert_eq!(report.center, ChunkCoord::new(0, 0));
        assert_eq!(streamer.loaded_count(), ctx.config().required_chunk_count());
        assert_eq!(
            sink.live_of(ArchetypeKind::Ground),
            25 * ctx.grid().tiles_per_chunk()
        );
    }

    #[test]
    fn test_chunk_placements_start_with_ground() {
        let ctx = WorldGenerationContext::new(WorldConfig::default()).expect("valid config");
        let chunk = ctx.generate_chunk(ChunkCoord::new(0, 0));
        let first = chunk.placements(ctx.grid()).next().expect("at least one tile");
        assert_eq!(first.archetype, ArchetypeKind::Ground);
        assert_eq!(first.position, WorldPosition::ORIGIN);
    }
}
