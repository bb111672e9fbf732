//! Procedural terrain field
//!
//! Height is a closed-form sum of sine waves. Sharper, taller terms fade in as
//! the progress ratio climbs from 0 to 1 over the ramp distance, so the course
//! starts as gentle rolling hills and ends in steep peaks.
//!
//! Samples are cached at a fixed step behind a monotonic frontier. The cache
//! only speeds up queries: every cached height equals [`height_function`] at
//! the same X, and queries past the frontier evaluate the formula directly.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::world_to_meters;

/// A cached `(x, surface y)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
}

/// Difficulty ratio in `[0, 1]` for a world X
#[inline]
pub fn progress_at(x: f32) -> f32 {
    (world_to_meters(x) / RAMP_DISTANCE_M).min(1.0)
}

/// Surface Y at any world X
///
/// Pure and continuous. Terms gated on progress are scaled by how far past
/// their threshold the ratio is, so they enter at zero amplitude.
pub fn height_function(x: f32) -> f32 {
    let progress = progress_at(x);

    // Base gentle rolling
    let mut h = (x * 0.003).sin() * 60.0;

    // Medium hills
    h += (x * 0.008 + 1.3).sin() * (50.0 + progress * 90.0);

    // Sharper features
    h += (x * 0.02 + 2.7).sin() * (20.0 + progress * 60.0);

    // Sharp peaks at moderate distance
    if progress > 0.15 {
        h += (x * 0.04 + 4.1).sin() * ((progress - 0.15) * 70.0);
    }

    // Steep ramps far out
    if progress > 0.5 {
        h += (x * 0.06 + 5.5).sin() * ((progress - 0.5) * 40.0);
    }

    GROUND_BASE - h
}

/// Incrementally generated terrain
#[derive(Debug, Clone)]
pub struct Terrain {
    /// Sample `i` sits at `x = i * SEGMENT_WIDTH`
    samples: Vec<SamplePoint>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new()
    }
}

impl Terrain {
    /// Create terrain with the initial chunk already generated
    pub fn new() -> Self {
        let mut terrain = Self {
            samples: Vec::new(),
        };
        terrain.reset();
        terrain
    }

    /// Drop the cache and regenerate the initial chunk
    pub fn reset(&mut self) {
        self.samples.clear();
        self.ensure_generated(INITIAL_TERRAIN_X);
    }

    /// Farthest X covered by the cache (exclusive)
    #[inline]
    pub fn generated_up_to(&self) -> f32 {
        self.samples.len() as f32 * SEGMENT_WIDTH
    }

    /// Cached samples in increasing X order
    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Extend the cache forward until the frontier reaches `target_x`
    ///
    /// Never regenerates or moves the frontier backward.
    pub fn ensure_generated(&mut self, target_x: f32) {
        if !target_x.is_finite() {
            return;
        }

        let before = self.samples.len();
        while self.generated_up_to() < target_x {
            let x = self.samples.len() as f32 * SEGMENT_WIDTH;
            self.samples.push(SamplePoint {
                x,
                y: height_function(x),
            });
        }

        if self.samples.len() > before {
            log::trace!(
                "terrain frontier {} -> {} ({} samples)",
                before as f32 * SEGMENT_WIDTH,
                self.generated_up_to(),
                self.samples.len()
            );
        }
    }

    /// Surface Y at any X, interpolated from the cache where possible
    pub fn height_at(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return GROUND_BASE;
        }

        let idx = x / SEGMENT_WIDTH;
        let i = idx.floor();

        // Past the frontier (or on its last sample): evaluate directly.
        // Checked in float space so huge or infinite X never reaches the cast.
        let last = self.samples.len() as f32 - 1.0;
        if i.is_nan() || i >= last {
            return height_function(x);
        }

        let frac = idx - i;
        let i = i as usize;

        let a = self.samples[i];
        let b = self.samples[i + 1];
        a.y + (b.y - a.y) * frac
    }

    /// Surface angle (radians) at X from a central difference over one step
    pub fn slope_at(&self, x: f32) -> f32 {
        let dx = SEGMENT_WIDTH * 0.5;
        let left = self.height_at(x - dx);
        let right = self.height_at(x + dx);
        (right - left).atan2(dx * 2.0)
    }

    /// Sample indices covering `[left, right]` plus one sample of margin on
    /// each side, clamped to the cache. `None` when nothing intersects.
    pub fn visible_range(&self, left: f32, right: f32) -> Option<RangeInclusive<usize>> {
        let last = self.samples.len().checked_sub(1)?;

        let start = ((left / SEGMENT_WIDTH).floor() - 1.0).max(0.0) as usize;
        let end = (right / SEGMENT_WIDTH).ceil() + 1.0;
        if end < 0.0 {
            return None;
        }
        let end = (end as usize).min(last);

        if start >= end {
            return None;
        }
        Some(start..=end)
    }
}
