//! Frozen rivers and lakes.
//!
//! Water is placed per chunk from a low-frequency noise field: tiles whose
//! sample clears a threshold seed a meandering river, and a coarser grid of
//! samples seeds roughly circular lakes. Shapes are drawn from a random
//! stream keyed by the chunk coordinate, so a chunk always regenerates the
//! same water.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tundra_common::{ChunkCoord, ConfigError, ConfigResult, WorldGrid, WorldPosition};

use crate::noise::PermutationNoise;
use crate::rng::TileRng;

/// Salt separating the water stream from decoration streams.
const WATER_STREAM_SALT: u64 = 0x57A7_E12B_0D1E_5000;

/// Vertex radius jitter applied to lake outlines.
const LAKE_VERTEX_JITTER: (f32, f32) = (0.8, 1.2);

/// Degrees a river may turn per unit of windiness on each step.
const RIVER_TURN_DEGREES: f32 = 30.0;

/// River and lake generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSettings {
    /// Generate water at all
    pub enabled: bool,
    /// Seed for the water noise field
    pub noise_seed: u64,
    /// Water noise input frequency
    pub noise_frequency: f32,
    /// Sample value above which a tile starts a river
    pub river_threshold: f32,
    /// Scale applied to world positions before sampling for rivers
    pub river_sample_scale: f32,
    /// River width, also the length of one river step
    pub river_width: f32,
    /// Distance from the source before a river may stop
    pub min_river_length: f32,
    /// How sharply rivers meander (0 = straight)
    pub river_windiness: f32,
    /// Maximum steps per river
    pub max_river_segments: u32,
    /// Chance per step of ending a river once past the minimum length
    pub river_stop_chance: f32,
    /// Sample value above which a lake is placed
    pub lake_threshold: f32,
    /// Scale applied to world positions before sampling for lakes
    pub lake_sample_scale: f32,
    /// Tile stride between lake samples
    pub lake_stride: u32,
    /// Smallest lake radius
    pub lake_min_size: f32,
    /// Largest lake radius
    pub lake_max_size: f32,
    /// Vertices per lake outline
    pub lake_segments: u32,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            noise_seed: 1337,
            noise_frequency: 0.01,
            river_threshold: 0.7,
            river_sample_scale: 0.1,
            river_width: 1.5,
            min_river_length: 10.0,
            river_windiness: 0.8,
            max_river_segments: 20,
            river_stop_chance: 0.2,
            lake_threshold: 0.8,
            lake_sample_scale: 0.05,
            lake_stride: 4,
            lake_min_size: 5.0,
            lake_max_size: 15.0,
            lake_segments: 12,
        }
    }
}

impl WaterSettings {
    /// Rejects settings that cannot produce well-formed shapes.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |name: &'static str, reason: &str| {
            Err(ConfigError::InvalidWaterSetting {
                name,
                reason: reason.to_string(),
            })
        };

        if !positive(self.river_width) {
            return invalid("river_width", "must be positive");
        }
        if !self.min_river_length.is_finite() || self.min_river_length < 0.0 {
            return invalid("min_river_length", "must not be negative");
        }
        if self.max_river_segments == 0 {
            return invalid("max_river_segments", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.river_stop_chance) {
            return invalid("river_stop_chance", "must be within [0, 1]");
        }
        if self.lake_stride == 0 {
            return invalid("lake_stride", "must be at least 1");
        }
        if self.lake_segments < 3 {
            return invalid("lake_segments", "a lake needs at least 3 vertices");
        }
        if !positive(self.lake_min_size) {
            return invalid("lake_min_size", "must be positive");
        }
        if !self.lake_max_size.is_finite() || self.lake_max_size < self.lake_min_size {
            return invalid("lake_max_size", "must be at least lake_min_size");
        }
        for (name, value) in [
            ("noise_frequency", self.noise_frequency),
            ("river_sample_scale", self.river_sample_scale),
            ("lake_sample_scale", self.lake_sample_scale),
            ("river_windiness", self.river_windiness),
        ] {
            if !value.is_finite() {
                return invalid(name, "must be finite");
            }
        }
        Ok(())
    }
}

/// Shape family of a water body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterKind {
    /// Open polyline with a width
    River,
    /// Closed polygon
    Lake,
}

/// A single river or lake in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBody {
    /// Shape family
    pub kind: WaterKind,
    /// River path or lake outline
    pub points: Vec<Vec2>,
    /// River width (0 for lakes)
    pub width: f32,
}

impl WaterBody {
    /// Position the entity for this body is anchored at.
    #[must_use]
    pub fn anchor(&self) -> WorldPosition {
        match self.kind {
            WaterKind::River => self.points.first().copied().unwrap_or(Vec2::ZERO).into(),
            WaterKind::Lake => self.centroid().into(),
        }
    }

    /// Returns `true` if `point` lies on the water.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self.kind {
            WaterKind::River => self
                .points
                .windows(2)
                .any(|w| distance_to_segment(point, w[0], w[1]) <= self.width / 2.0),
            WaterKind::Lake => point_in_polygon(point, &self.points),
        }
    }

    fn centroid(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::ZERO;
        }
        self.points.iter().copied().sum::<Vec2>() / self.points.len() as f32
    }
}

/// Builds the noise field water placement samples from.
#[must_use]
pub fn water_noise(settings: &WaterSettings) -> PermutationNoise {
    PermutationNoise::new(settings.noise_seed, crate::noise::NoiseKind::Perlin)
        .with_frequency(settings.noise_frequency)
}

/// Generates every river and lake sourced inside `chunk`.
///
/// Bodies may extend past the chunk edge; they belong to the chunk that
/// sourced them and load and unload with it.
#[must_use]
pub fn generate_water_bodies(
    chunk: ChunkCoord,
    grid: &WorldGrid,
    noise: &PermutationNoise,
    settings: &WaterSettings,
    salt: u64,
) -> Vec<WaterBody> {
    if !settings.enabled {
        return Vec::new();
    }

    let origin_tile = chunk.origin_tile(grid.chunk_size());
    let stream_seed = TileRng::new(origin_tile.seed(), salt ^ WATER_STREAM_SALT).next_u64();
    let mut rng = fastrand::Rng::with_seed(stream_seed);
    let origin = grid.chunk_origin(chunk).as_vec2();
    let tile_size = grid.tile_size();
    let size = grid.chunk_size();

    let mut bodies = Vec::new();

    for x in 0..size {
        for y in 0..size {
            let pos = origin + Vec2::new(x as f32, y as f32) * tile_size;
            let scaled = pos * settings.river_sample_scale;
            if noise.sample_raw(scaled.x, scaled.y) > settings.river_threshold {
                bodies.push(river(pos, settings, &mut rng));
            }
        }
    }

    let stride = settings.lake_stride as usize;
    for x in (0..size).step_by(stride) {
        for y in (0..size).step_by(stride) {
            let pos = origin + Vec2::new(x as f32, y as f32) * tile_size;
            let scaled = pos * settings.lake_sample_scale;
            if noise.sample_raw(scaled.x, scaled.y) > settings.lake_threshold {
                bodies.push(lake(pos, settings, &mut rng));
            }
        }
    }

    bodies
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn range(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

fn river(start: Vec2, settings: &WaterSettings, rng: &mut fastrand::Rng) -> WaterBody {
    let mut points = vec![start];
    let mut current = start;
    let mut angle = range(rng, 0.0, 360.0);

    for _ in 0..settings.max_river_segments {
        let turn = settings.river_windiness * RIVER_TURN_DEGREES;
        angle += range(rng, -turn, turn);
        current += Vec2::from_angle(angle.to_radians()) * settings.river_width;
        points.push(current);

        if start.distance(current) > settings.min_river_length
            && rng.f32() < settings.river_stop_chance
        {
            break;
        }
    }

    WaterBody {
        kind: WaterKind::River,
        points,
        width: settings.river_width,
    }
}

fn lake(center: Vec2, settings: &WaterSettings, rng: &mut fastrand::Rng) -> WaterBody {
    let radius = range(rng, settings.lake_min_size, settings.lake_max_size);
    let segments = settings.lake_segments;
    let points = (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            let jitter = range(rng, LAKE_VERTEX_JITTER.0, LAKE_VERTEX_JITTER.1);
            center + Vec2::from_angle(angle) * radius * jitter
        })
        .collect();

    WaterBody {
        kind: WaterKind::Lake,
        points,
        width: 0.0,
    }
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let line = end - start;
    let length = line.length();
    if length <= f32::EPSILON {
        return point.distance(start);
    }
    let direction = line / length;
    let projection = (point - start).dot(direction).clamp(0.0, length);
    point.distance(start + direction * projection)
}

/// Even-odd rule.
fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
