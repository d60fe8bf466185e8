//! Headless session loop.
//!
//! Stands in for the game: a scripted player walks through the world, the
//! streamer keeps chunks loaded around it, and every few frames the player
//! chops the nearest tree and mines the nearest rock it can reach.

use tracing::{debug, info};
use tundra_common::{ConfigResult, TileCoord, WorldPosition};
use tundra_world::{
    ContentKind, PlayerPositionProvider, RecordingSink, TreeState, WorldGenerationContext,
    WorldStreamer,
};

use crate::config::{EngineConfig, SimulationConfig};

/// Player that walks along a slowly turning heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedWalker {
    position: WorldPosition,
    /// Heading in radians (0 = +x)
    heading: f32,
    /// World units per second
    speed: f32,
    /// Radians per second
    turn_rate: f32,
}

impl ScriptedWalker {
    /// Creates a walker at `position` heading along +x.
    #[must_use]
    pub const fn new(position: WorldPosition, speed: f32, turn_rate: f32) -> Self {
        Self {
            position,
            heading: 0.0,
            speed,
            turn_rate,
        }
    }

    /// Moves the walker forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.heading = (self.heading + self.turn_rate * dt).rem_euclid(std::f32::consts::TAU);
        let step = self.speed * dt;
        self.position = WorldPosition::new(
            self.position.x + self.heading.cos() * step,
            self.position.y + self.heading.sin() * step,
        );
    }
}

impl PlayerPositionProvider for ScriptedWalker {
    fn current_world_position(&self) -> WorldPosition {
        self.position
    }
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Frames simulated
    pub frames: u32,
    /// Chunks loaded at the end
    pub loaded_chunks: usize,
    /// Entities alive in the sink at the end
    pub live_entities: usize,
    /// Ledger entries recorded
    pub ledger_size: usize,
    /// Trees chopped
    pub trees_chopped: u32,
    /// Rocks mined
    pub rocks_mined: u32,
    /// Chunk generations
    pub chunk_loads: usize,
    /// Chunk unloads
    pub chunk_unloads: usize,
}

/// Everything a running session owns.
#[derive(Debug)]
pub struct Simulation {
    ctx: WorldGenerationContext,
    streamer: WorldStreamer,
    sink: RecordingSink,
    walker: ScriptedWalker,
    settings: SimulationConfig,
    dt: f32,
    summary: SimulationSummary,
}

impl Simulation {
    /// Builds a session. Fails if the world configuration is invalid.
    pub fn new(config: &EngineConfig) -> ConfigResult<Self> {
        let ctx = WorldGenerationContext::new(config.world.clone())?;
        let streamer = WorldStreamer::new(ctx.config());
        let walker = ScriptedWalker::new(
            WorldPosition::ORIGIN,
            config.simulation.player_speed,
            config.simulation.turn_rate,
        );

        Ok(Self {
            ctx,
            streamer,
            sink: RecordingSink::with_archetypes(config.world.archetypes.clone()),
            walker,
            settings: config.simulation.clone(),
            dt: config.frame_dt(),
            summary: SimulationSummary::default(),
        })
    }

    /// Runs the configured number of frames and returns the totals.
    pub fn run(&mut self) -> SimulationSummary {
        info!(frames = self.settings.frames, dt = self.dt, "simulation starting");
        for _ in 0..self.settings.frames {
            self.step();
        }
        self.summary()
    }

    /// Simulates one frame.
    pub fn step(&mut self) {
        self.walker.advance(self.dt);

        let report = self.streamer.tick_with(&self.ctx, &self.walker, &mut self.sink);
        if report.changed() {
            debug!(
                center = %report.center,
                loaded = report.loaded.len(),
                unloaded = report.unloaded.len(),
                pending = report.pending,
                "streaming changed"
            );
        }
        self.summary.chunk_loads += report.loaded.len();
        self.summary.chunk_unloads += report.unloaded.len();
        self.summary.frames += 1;

        let interval = self.settings.chop_interval;
        if interval > 0 && self.summary.frames % interval == 0 {
            self.harvest();
        }
    }

    /// Chops the nearest standing tree and mines the nearest rock in reach.
    fn harvest(&mut self) {
        let player = self.ctx.grid().tile_at(self.walker.current_world_position());

        let tree = self.nearest(player, |ctx, tile, kind| {
            kind == ContentKind::Tree(TreeState::Standing) && !ctx.is_tree_chopped(tile)
        });
        if let Some(tile) = tree {
            if self.ctx.record_tree_chopped(tile) {
                self.summary.trees_chopped += 1;
                debug!(x = tile.x, y = tile.y, "chopped tree");
            }
        }

        let rock = self.nearest(player, |ctx, tile, kind| {
            matches!(kind, ContentKind::Rock(_)) && !ctx.is_rock_destroyed(tile)
        });
        if let Some(tile) = rock {
            if self.ctx.record_rock_destroyed(tile) {
                self.summary.rocks_mined += 1;
                debug!(x = tile.x, y = tile.y, "mined rock");
            }
        }
    }

    /// Nearest loaded tile within reach whose content matches `wanted`.
    ///
    /// Ties break on tile order so the choice never depends on map order.
    fn nearest(
        &self,
        player: TileCoord,
        wanted: impl Fn(&WorldGenerationContext, TileCoord, ContentKind) -> bool,
    ) -> Option<TileCoord> {
        self.streamer
            .chunks()
            .flat_map(|chunk| chunk.decorations())
            .filter(|content| content.tile.chebyshev_distance(player) <= self.settings.reach)
            .filter(|content| wanted(&self.ctx, content.tile, content.kind))
            .map(|content| (content.tile.chebyshev_distance(player), content.tile))
            .min()
            .map(|(_, tile)| tile)
    }

    /// Current totals.
    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            loaded_chunks: self.streamer.loaded_count(),
            live_entities: self.sink.live_count(),
            ledger_size: self.ctx.ledger().modification_count(),
            ..self.summary
        }
    }

    /// Player position.
    #[must_use]
    pub fn player(&self) -> WorldPosition {
        self.walker.current_world_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tundra_world::WorldConfig;

    fn config(frames: u32) -> EngineConfig {
        EngineConfig {
            simulation: SimulationConfig {
                frames,
                ..SimulationConfig::default()
            },
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_walker_moves_at_speed() {
        let mut walker = ScriptedWalker::new(WorldPosition::ORIGIN, 2.0, 0.0);
        walker.advance(0.5);
        let position = walker.current_world_position();
        assert!((position.x - 1.0).abs() < 1e-5);
        assert!(position.y.abs() < 1e-5);
    }

    #[test]
    fn test_walker_turns() {
        use std::f32::consts::FRAC_PI_2;

        let mut walker = ScriptedWalker::new(WorldPosition::ORIGIN, 1.0, FRAC_PI_2);
        walker.advance(1.0);
        assert!((walker.heading - FRAC_PI_2).abs() < 1e-5);
        let position = walker.current_world_position();
        assert!(position.x.abs() < 1e-4);
        assert!((position.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_world_is_fatal() {
        let mut config = config(1);
        config.world.tile_size = -1.0;
        assert!(Simulation::new(&config).is_err());
    }

    #[test]
    fn test_session_keeps_required_square_loaded() {
        let mut sim = Simulation::new(&config(600)).expect("valid config");
        let summary = sim.run();

        assert_eq!(summary.frames, 600);
        assert_eq!(summary.loaded_chunks, 25);
        assert_eq!(summary.chunk_loads - summary.chunk_unloads, 25);

        let center = sim.ctx.grid().chunk_at(sim.player());
        assert_eq!(sim.streamer.center(), Some(center));
    }

    #[test]
    fn test_harvest_records_into_ledger() {
        let mut config = config(60);
        config.world = WorldConfig {
            tree_spawn_chance: 0.5,
            rock_spawn_chance: 0.5,
            critter_spawn_chance: 0.0,
            ..WorldConfig::default()
        };
        config.simulation.chop_interval = 10;

        let mut sim = Simulation::new(&config).expect("valid config");
        let summary = sim.run();

        assert_eq!(summary.trees_chopped, 6);
        assert!(summary.rocks_mined > 0);
        assert_eq!(
            summary.ledger_size,
            (summary.trees_chopped + summary.rocks_mined) as usize
        );
    }

    #[test]
    fn test_zero_interval_never_harvests() {
        let mut config = config(120);
        config.simulation.chop_interval = 0;
        let summary = Simulation::new(&config).expect("valid config").run();
        assert_eq!(summary.ledger_size, 0);
    }
}
