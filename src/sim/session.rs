//! Run orchestration
//!
//! Owns the terrain, fuel, dust and camera for one run and advances them in a
//! fixed order each frame. The vehicle is borrowed per call.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::fuel::FuelSystem;
use super::particles::ParticlePool;
use super::terrain::Terrain;
use super::vehicle::{DriveInput, Vehicle};
use crate::consts::{GENERATION_LOOKAHEAD_VIEWS, MAX_FRAME_DT};
use crate::records::DistanceRecord;
use crate::tuning::Tuning;
use crate::{Viewport, world_to_meters};

/// Mixed into the session seed for the dust stream
const DUST_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phase {
    /// Title screen, nothing simulated
    #[default]
    Start,
    Playing,
    Paused,
    /// Tank ran dry
    GameOver,
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Floored meters travelled
    pub distance_m: u32,
    /// Best distance after this run
    pub best_m: u32,
    pub new_record: bool,
}

/// One hill-climb session
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    terrain: Terrain,
    fuel: FuelSystem,
    particles: ParticlePool,
    camera: Camera,
    /// Meters; never decreases during a run
    distance: f32,
    record: DistanceRecord,
    viewport: Viewport,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, record: DistanceRecord) -> Self {
        Self {
            phase: Phase::Start,
            terrain: Terrain::new(),
            fuel: FuelSystem::with_rng(tuning.fuel, Pcg32::seed_from_u64(seed)),
            particles: ParticlePool::with_rng(
                tuning.particles,
                Pcg32::seed_from_u64(seed ^ DUST_SEED_SALT),
            ),
            camera: Camera::new(tuning.camera),
            distance: 0.0,
            record,
            viewport: Viewport::default(),
        }
    }

    /// Begin a fresh run (also used to restart after game over)
    pub fn start<V: Vehicle + ?Sized>(&mut self, vehicle: &mut V) {
        self.terrain.reset();
        vehicle.reset();
        self.camera.reset();
        self.fuel.reset();
        self.particles.reset();
        self.distance = 0.0;
        self.phase = Phase::Playing;
        log::info!("Run started (best {}m)", self.record.best);
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advance one frame. Returns the run summary on the frame the tank
    /// runs dry; does nothing outside [`Phase::Playing`].
    pub fn frame<V: Vehicle + ?Sized>(
        &mut self,
        dt: f32,
        vehicle: &mut V,
        input: &DriveInput,
    ) -> Option<RunSummary> {
        if self.phase != Phase::Playing {
            return None;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        vehicle.update(dt, input, &self.terrain);
        let state = vehicle.state();
        let meters = world_to_meters(state.pos.x);
        if meters.is_finite() {
            self.distance = self.distance.max(meters);
        }

        // Cans placed this frame must land on generated ground
        self.terrain
            .ensure_generated(state.pos.x + self.viewport.width * GENERATION_LOOKAHEAD_VIEWS);
        self.fuel.update(dt, &state, &self.terrain, self.distance);
        if self.fuel.is_empty() {
            return Some(self.finish());
        }

        self.camera.update(dt, &state);
        self.particles.update(dt, &state);
        None
    }

    fn finish(&mut self) -> RunSummary {
        self.phase = Phase::GameOver;
        let distance_m = self.distance.floor() as u32;
        let new_record = self.record.submit(distance_m);
        if new_record {
            self.record.save();
            log::info!("Out of fuel at {}m, new record!", distance_m);
        } else {
            log::info!("Out of fuel at {}m (best {}m)", distance_m, self.record.best);
        }
        RunSummary {
            distance_m,
            best_m: self.record.best,
            new_record,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn fuel(&self) -> &FuelSystem {
        &self.fuel
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Meters travelled this run
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn record(&self) -> &DistanceRecord {
        &self.record
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
