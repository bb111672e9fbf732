//! Fuel system
//!
//! Continuous drain plus discrete refills from cans placed on the terrain as
//! the run progresses. Each update runs, in order: drain, spawn scheduling,
//! pickup, effect aging, cleanup. Spawning before pickup means a can that
//! becomes due under the vehicle is collected the same frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use super::vehicle::VehicleState;
use crate::meters_to_world;
use crate::tuning::FuelTuning;

/// Upper bound on cans placed in a single update
pub const MAX_SPAWNS_PER_FRAME: usize = 32;

/// A fuel can sitting on the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCan {
    /// Can center
    pub pos: Vec2,
    /// One-way latch; collected cans are hidden until cleanup drops them
    pub collected: bool,
}

/// Expanding ring shown where a can was collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectEffect {
    pub pos: Vec2,
    /// Seconds remaining
    pub timer: f32,
}

impl CollectEffect {
    /// Elapsed fraction in `[0, 1]` for an effect of the given duration
    pub fn progress(&self, duration: f32) -> f32 {
        (1.0 - self.timer / duration).clamp(0.0, 1.0)
    }
}

/// HUD band for the fuel bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelGauge {
    Normal,
    /// Below 40%
    Warning,
    /// Below 15%
    Critical,
}

impl FuelGauge {
    pub fn from_percent(percent: f32) -> Self {
        if percent < 15.0 {
            FuelGauge::Critical
        } else if percent < 40.0 {
            FuelGauge::Warning
        } else {
            FuelGauge::Normal
        }
    }

    /// Class toggled on the HUD fuel bar for this band
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            FuelGauge::Normal => None,
            FuelGauge::Warning => Some("warning"),
            FuelGauge::Critical => Some("critical"),
        }
    }
}

/// Fuel level, cans and pickup effects
#[derive(Debug, Clone)]
pub struct FuelSystem<R: Rng = Pcg32> {
    tuning: FuelTuning,
    /// May dip below zero within a frame; reported clamped
    fuel: f32,
    cans: Vec<FuelCan>,
    effects: Vec<CollectEffect>,
    /// Distance (meters) at which the next can is placed
    next_can_distance: f32,
    rng: R,
}

impl FuelSystem<Pcg32> {
    /// Default tuning with a seeded generator
    pub fn new(seed: u64) -> Self {
        Self::with_rng(FuelTuning::default(), Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> FuelSystem<R> {
    pub fn with_rng(tuning: FuelTuning, rng: R) -> Self {
        let mut system = Self {
            tuning,
            fuel: tuning.max_fuel,
            cans: Vec::new(),
            effects: Vec::new(),
            next_can_distance: 0.0,
            rng,
        };
        system.reset();
        system
    }

    /// Full tank, no cans, first can a short drive away
    pub fn reset(&mut self) {
        self.fuel = self.tuning.max_fuel;
        self.cans.clear();
        self.effects.clear();
        self.next_can_distance = self.tuning.schedule.first_can_m;
    }

    pub fn tuning(&self) -> &FuelTuning {
        &self.tuning
    }

    /// Raw level; can be negative right after the tank runs dry
    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Fuel as a percentage of the tank, never negative
    pub fn percent(&self) -> f32 {
        (self.fuel.max(0.0) / self.tuning.max_fuel * 100.0).min(100.0)
    }

    pub fn gauge(&self) -> FuelGauge {
        FuelGauge::from_percent(self.percent())
    }

    /// Terminal condition for the run
    pub fn is_empty(&self) -> bool {
        self.fuel <= 0.0
    }

    pub fn cans(&self) -> &[FuelCan] {
        &self.cans
    }

    pub fn effects(&self) -> &[CollectEffect] {
        &self.effects
    }

    pub fn next_can_distance(&self) -> f32 {
        self.next_can_distance
    }

    /// Advance one frame. `distance` is the run's travelled distance in meters.
    ///
    /// The terrain must already be generated past the vehicle for this frame.
    pub fn update(&mut self, dt: f32, vehicle: &VehicleState, terrain: &Terrain, distance: f32) {
        let t = self.tuning;

        // Drain
        let driving = vehicle.vel.x.abs() > t.driving_speed;
        let drain = if driving { t.drive_drain } else { t.idle_drain };
        self.fuel -= drain * dt;

        // Spawn every can the run has reached. A jump far ahead drops the
        // backlog and reschedules from the current distance.
        let mut spawned = 0;
        while distance.is_finite() && distance >= self.next_can_distance {
            if spawned == MAX_SPAWNS_PER_FRAME {
                self.next_can_distance = distance + self.spawn_interval(distance);
                log::debug!("spawn backlog skipped, next can at {:.0}m", self.next_can_distance);
                break;
            }
            self.spawn_can(self.next_can_distance, terrain);
            self.next_can_distance += self.spawn_interval(self.next_can_distance);
            spawned += 1;
        }

        // Pickup
        for can in self.cans.iter_mut().filter(|c| !c.collected) {
            if can.pos.distance(vehicle.pos) < t.pickup_radius {
                can.collected = true;
                self.fuel = (self.fuel + t.can_refill).min(t.max_fuel);
                self.effects.push(CollectEffect {
                    pos: can.pos,
                    timer: t.collect_fx_duration,
                });
                log::debug!(
                    "fuel can collected at x={:.0}, fuel now {:.1}",
                    can.pos.x,
                    self.fuel
                );
            }
        }

        // Effect aging
        for effect in &mut self.effects {
            effect.timer -= dt;
        }
        self.effects.retain(|e| e.timer > 0.0);

        // Cleanup, collected or not
        let cutoff = vehicle.pos.x - t.cleanup_distance;
        self.cans.retain(|c| c.pos.x > cutoff);
    }

    /// Meters until the can after one placed at `distance_m`
    fn spawn_interval(&mut self, distance_m: f32) -> f32 {
        let band = self.tuning.schedule.band_for(distance_m);
        band.base + self.rng.random::<f32>() * band.spread
    }

    /// Place a can resting on the surface at `distance_m`
    fn spawn_can(&mut self, distance_m: f32, terrain: &Terrain) {
        let x = meters_to_world(distance_m);
        let surface = terrain.height_at(x);
        let can = FuelCan {
            pos: Vec2::new(x, surface - self.tuning.can_size - self.tuning.can_lift),
            collected: false,
        };
        log::debug!("fuel can spawned at {}m (x={:.0}, y={:.1})", distance_m, can.pos.x, can.pos.y);
        self.cans.push(can);
    }
}
