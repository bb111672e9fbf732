//! Summit - A side-scrolling hill climber
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (terrain field, fuel, dust, camera, session)
//! - `render`: Drawing-surface abstraction and render passes
//! - `platform`: Browser frontend (Canvas2D + wasm-bindgen)
//! - `tuning`: Data-driven game balance
//! - `settings` / `records`: Player preferences and best distance

pub mod platform;
pub mod records;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use records::DistanceRecord;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// World geometry constants
pub mod consts {
    /// World units between terrain sample points
    pub const SEGMENT_WIDTH: f32 = 5.0;
    /// Base surface Y (screen space grows downward, so lower = higher on screen)
    pub const GROUND_BASE: f32 = 400.0;
    /// Thickness of the grass strip drawn on the surface
    pub const GRASS_DEPTH: f32 = 8.0;
    /// World units per meter of travelled distance
    pub const UNITS_PER_METER: f32 = 10.0;
    /// Distance (meters) over which the terrain ramps to full difficulty
    pub const RAMP_DISTANCE_M: f32 = 2000.0;
    /// Terrain generated eagerly on reset
    pub const INITIAL_TERRAIN_X: f32 = 3000.0;
    /// Terrain is kept generated this many view widths ahead of the vehicle
    pub const GENERATION_LOOKAHEAD_VIEWS: f32 = 2.0;
    /// Frame delta cap (seconds) applied by the session
    pub const MAX_FRAME_DT: f32 = 0.05;
}

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Convert a `0xRRGGBB` literal to a linear RGBA color
#[inline]
pub const fn rgb(hex: u32) -> [f32; 4] {
    rgba(hex, 1.0)
}

/// Convert a `0xRRGGBB` literal plus alpha to an RGBA color
#[inline]
pub const fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// World X (units) to travelled distance (meters)
#[inline]
pub fn world_to_meters(x: f32) -> f32 {
    x / consts::UNITS_PER_METER
}

/// Travelled distance (meters) to world X (units)
#[inline]
pub fn meters_to_world(meters: f32) -> f32 {
    meters * consts::UNITS_PER_METER
}
