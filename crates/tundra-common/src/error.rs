//! Error types for Tundra.

use thiserror::Error;

/// Top-level error type for Tundra operations.
#[derive(Debug, Error)]
pub enum TundraError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal configuration errors, reported when the world is initialized.
///
/// A world cannot start with any of these; there is no per-chunk recovery.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required archetype (prefab) reference is empty
    #[error("Missing archetype reference: {0}")]
    MissingArchetype(&'static str),

    /// Chunk size is zero or too large for local coordinates
    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(u32),

    /// Tile size is not a positive finite number
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(f32),

    /// A spawn chance is outside [0, 1]
    #[error("Invalid spawn chance for {name}: {value}")]
    InvalidSpawnChance {
        /// Setting name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A water-body setting is out of range
    #[error("Invalid water setting {name}: {reason}")]
    InvalidWaterSetting {
        /// Setting name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Per-tick load budget of zero would never load anything
    #[error("Load budget must be at least 1 chunk per tick")]
    InvalidLoadBudget,

    /// Load radius beyond what a streamer can keep resident
    #[error("Invalid load radius: {0} chunks")]
    InvalidLoadRadius(u32),

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Result type alias for Tundra operations.
pub type TundraResult<T> = Result<T, TundraError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
