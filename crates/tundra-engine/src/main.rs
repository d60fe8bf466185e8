//! # Tundra Engine
//!
//! Headless host for the Tundra world.
//!
//! Loads `tundra.toml` (or the path given as the first argument), builds the
//! world generation context, and streams chunks around a scripted player for
//! a fixed number of frames. `tundra --init [path]` writes the default
//! configuration and exits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod sim;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};
use crate::sim::Simulation;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("tundra=info".parse()?))
        .init();

    info!("Tundra starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--init") {
        let path = args.next().unwrap_or_else(|| CONFIG_FILE.to_owned());
        EngineConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing default config to {path}"))?;
        return Ok(());
    }

    let path = first.unwrap_or_else(|| CONFIG_FILE.to_owned());
    let mut config = EngineConfig::load_from(&path);
    config.validate();

    let mut simulation = Simulation::new(&config).context("invalid world configuration")?;
    let summary = simulation.run();

    let player = simulation.player();
    info!(
        frames = summary.frames,
        player_x = player.x,
        player_y = player.y,
        loaded_chunks = summary.loaded_chunks,
        live_entities = summary.live_entities,
        ledger_size = summary.ledger_size,
        trees_chopped = summary.trees_chopped,
        rocks_mined = summary.rocks_mined,
        chunk_loads = summary.chunk_loads,
        chunk_unloads = summary.chunk_unloads,
        "session summary"
    );

    info!("Tundra shutdown complete");
    Ok(())
}
