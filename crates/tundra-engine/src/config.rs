//! Engine configuration.
//!
//! Host settings plus the [`WorldConfig`] for the session. Loaded from a
//! TOML file; a missing or unreadable file falls back to defaults so the
//! engine always starts. World settings are validated separately and are
//! fatal when wrong.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};
use tundra_common::{ConfigError, ConfigResult, TundraResult};
use tundra_world::WorldConfig;

/// Configuration file name.
pub const CONFIG_FILE: &str = "tundra.toml";

/// Scripted player and session length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Frames to simulate
    pub frames: u32,
    /// Player speed in world units per second
    pub player_speed: f32,
    /// Heading change in radians per second
    pub turn_rate: f32,
    /// Frames between chop/mine attempts (0 = never)
    pub chop_interval: u32,
    /// Reach in tiles (Chebyshev) for chopping and mining
    pub reach: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 3600,
            player_speed: 6.0,
            turn_rate: 0.1,
            chop_interval: 30,
            reach: 3,
        }
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated frames per second
    pub target_fps: u32,
    /// World generation and streaming
    pub world: WorldConfig,
    /// Scripted session
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            world: WorldConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::from_toml(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Parses configuration text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> TundraResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp host settings to sensible ranges.
    ///
    /// World settings are not touched; they are checked by
    /// [`WorldConfig::validate`].
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        if !self.simulation.player_speed.is_finite() {
            self.simulation.player_speed = 0.0;
        }
        self.simulation.player_speed = self.simulation.player_speed.clamp(0.0, 100.0);
        if !self.simulation.turn_rate.is_finite() {
            self.simulation.turn_rate = 0.0;
        }
    }

    /// Seconds per simulated frame.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}
