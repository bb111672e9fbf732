//! Dust particle pool
//!
//! Puffs of dust kicked up behind the rear wheels while the vehicle is
//! grounded and moving. Bounded: at capacity new puffs are dropped, existing
//! ones are never evicted early.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::vehicle::VehicleState;
use crate::rgb;
use crate::tuning::ParticleTuning;

/// Dust palette
pub const DUST_COLORS: [[f32; 4]; 4] = [
    rgb(0xd4b896),
    rgb(0xc9a87c),
    rgb(0xe0c8a0),
    rgb(0xdbb87a),
];

/// A single dust puff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub radius: f32,
    pub color: [f32; 4],
}

/// Bounded pool of dust particles
#[derive(Debug, Clone)]
pub struct ParticlePool<R: Rng = Pcg32> {
    tuning: ParticleTuning,
    particles: Vec<Particle>,
    /// Counts down to the next puff while dust is being kicked up
    spawn_timer: f32,
    rng: R,
}

impl ParticlePool<Pcg32> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ParticleTuning::default(), Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticlePool<R> {
    pub fn with_rng(tuning: ParticleTuning, rng: R) -> Self {
        Self {
            tuning,
            particles: Vec::with_capacity(tuning.max_particles),
            spawn_timer: 0.0,
            rng,
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.spawn_timer = 0.0;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn capacity(&self) -> usize {
        self.tuning.max_particles
    }

    /// Nominal lifetime, the reference for fading
    pub fn lifetime(&self) -> f32 {
        self.tuning.lifetime
    }

    /// Opacity of a particle: remaining life over nominal lifetime
    pub fn alpha_of(&self, particle: &Particle) -> f32 {
        (particle.life / self.tuning.lifetime).clamp(0.0, 1.0)
    }

    pub fn update(&mut self, dt: f32, vehicle: &VehicleState) {
        let t = self.tuning;

        if vehicle.grounded && vehicle.vel.x.abs() > t.min_speed {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                self.spawn_timer = t.spawn_interval;
                self.spawn_dust(vehicle);
            }
        }

        // Age, drop the dead, move the survivors
        self.particles.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }
            p.pos += p.vel * dt;
            p.vel.y -= t.drift * dt;
            true
        });
    }

    fn spawn_dust(&mut self, vehicle: &VehicleState) {
        let t = self.tuning;
        if self.particles.len() >= t.max_particles {
            return;
        }

        // Rear wheel area, behind the vehicle along its facing
        let facing = Vec2::from_angle(vehicle.angle);
        let rear = vehicle.pos - facing * t.rear_offset;

        let rng = &mut self.rng;
        let jitter = Vec2::new(
            (rng.random::<f32>() - 0.5) * t.jitter_x,
            (rng.random::<f32>() - 0.5) * t.jitter_y,
        );
        let vel = Vec2::new(
            -vehicle.vel.x * t.velocity_carry + (rng.random::<f32>() - 0.5) * t.velocity_jitter,
            -(rng.random::<f32>() * t.rise_speed_spread + t.rise_speed_min),
        );
        let life = t.lifetime * (t.life_min + rng.random::<f32>() * t.life_spread);
        let radius = rng.random::<f32>() * t.radius_spread + t.radius_min;
        let color = DUST_COLORS[rng.random_range(0..DUST_COLORS.len())];

        self.particles.push(Particle {
            pos: rear + jitter,
            vel,
            life,
            radius,
            color,
        });
    }
}
