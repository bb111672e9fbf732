//! Vehicle seam
//!
//! The vehicle body (physics, wheels, suspension) lives outside this crate.
//! The simulation only ever sees a by-value [`VehicleState`] snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;

/// Per-frame kinematic snapshot of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    /// Any wheel touching the ground
    pub grounded: bool,
}

/// Driver input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub gas: bool,
    pub brake: bool,
}

/// A body the session can advance and observe
pub trait Vehicle {
    /// Return to the start line
    fn reset(&mut self);
    /// Advance one frame against the terrain
    fn update(&mut self, dt: f32, input: &DriveInput, terrain: &Terrain);
    /// Current snapshot
    fn state(&self) -> VehicleState;
}

/// Vehicle simulated by the host; its state is pushed in before each frame
#[derive(Debug, Clone, Default)]
pub struct ExternalVehicle {
    state: VehicleState,
}

impl ExternalVehicle {
    pub fn set_state(&mut self, state: VehicleState) {
        self.state = state;
    }
}

impl Vehicle for ExternalVehicle {
    fn reset(&mut self) {
        self.state = VehicleState::default();
    }

    fn update(&mut self, _dt: f32, _input: &DriveInput, _terrain: &Terrain) {}

    fn state(&self) -> VehicleState {
        self.state
    }
}

/// Start X of the kinematic follower
pub const FOLLOWER_START_X: f32 = 200.0;
/// Height of the follower's reference point above the surface
pub const FOLLOWER_RIDE_HEIGHT: f32 = 20.0;

/// Kinematic stand-in that rides the surface at a throttled speed
///
/// Not a physics model: it never leaves the ground. Drives the headless
/// runner and the session tests.
#[derive(Debug, Clone)]
pub struct TerrainFollower {
    state: VehicleState,
    /// Acceleration under gas or brake (units/s²)
    pub accel: f32,
    /// Forward speed cap (units/s); reverse is capped at half
    pub max_speed: f32,
    /// Fraction of speed lost per second while coasting
    pub rolling_drag: f32,
}

impl Default for TerrainFollower {
    fn default() -> Self {
        let mut follower = Self {
            state: VehicleState::default(),
            accel: 240.0,
            max_speed: 400.0,
            rolling_drag: 0.8,
        };
        follower.reset();
        follower
    }
}

impl TerrainFollower {
    /// Place the follower at an arbitrary X on a given terrain
    pub fn place(&mut self, x: f32, terrain: &Terrain) {
        self.state.pos = Vec2::new(x, terrain.height_at(x) - FOLLOWER_RIDE_HEIGHT);
        self.state.angle = terrain.slope_at(x);
    }
}

impl Vehicle for TerrainFollower {
    fn reset(&mut self) {
        self.state = VehicleState {
            pos: Vec2::new(FOLLOWER_START_X, crate::consts::GROUND_BASE - FOLLOWER_RIDE_HEIGHT),
            vel: Vec2::ZERO,
            angle: 0.0,
            grounded: true,
        };
    }

    fn update(&mut self, dt: f32, input: &DriveInput, terrain: &Terrain) {
        let mut vx = self.state.vel.x;
        if input.gas {
            vx += self.accel * dt;
        }
        if input.brake {
            vx -= self.accel * dt;
        }
        if !input.gas && !input.brake {
            vx *= (1.0 - self.rolling_drag * dt).max(0.0);
        }
        vx = vx.clamp(-self.max_speed * 0.5, self.max_speed);

        let x = (self.state.pos.x + vx * dt).max(0.0);
        let y = terrain.height_at(x) - FOLLOWER_RIDE_HEIGHT;
        let vy = if dt > 0.0 {
            (y - self.state.pos.y) / dt
        } else {
            0.0
        };

        self.state.pos = Vec2::new(x, y);
        self.state.vel = Vec2::new(vx, vy);
        self.state.angle = terrain.slope_at(x);
        self.state.grounded = true;
    }

    fn state(&self) -> VehicleState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follower_rides_surface() {
        let terrain = Terrain::new();
        let mut follower = TerrainFollower::default();
        let gas = DriveInput {
            gas: true,
            ..Default::default()
        };
        for _ in 0..120 {
            follower.update(1.0 / 60.0, &gas, &terrain);
        }
        let state = follower.state();
        assert!(state.pos.x > FOLLOWER_START_X);
        assert!(state.vel.x > 0.0 && state.vel.x <= follower.max_speed);
        assert!((state.pos.y - (terrain.height_at(state.pos.x) - FOLLOWER_RIDE_HEIGHT)).abs() < 1e-3);
        assert_eq!(state.angle, terrain.slope_at(state.pos.x));
        assert!(state.grounded);
    }

    #[test]
    fn test_follower_coasts_to_stop() {
        let terrain = Terrain::new();
        let mut follower = TerrainFollower::default();
        let gas = DriveInput {
            gas: true,
            ..Default::default()
        };
        for _ in 0..60 {
            follower.update(1.0 / 60.0, &gas, &terrain);
        }
        let cruising = follower.state().vel.x;
        for _ in 0..600 {
            follower.update(1.0 / 60.0, &DriveInput::default(), &terrain);
        }
        assert!(follower.state().vel.x < cruising * 0.01);
    }

    #[test]
    fn test_external_vehicle_reports_pushed_state() {
        let terrain = Terrain::new();
        let mut vehicle = ExternalVehicle::default();
        let snapshot = VehicleState {
            pos: Vec2::new(512.0, 300.0),
            vel: Vec2::new(80.0, -4.0),
            angle: 0.2,
            grounded: true,
        };
        vehicle.set_state(snapshot);
        vehicle.update(0.016, &DriveInput::default(), &terrain);
        assert_eq!(vehicle.state(), snapshot);
        vehicle.reset();
        assert_eq!(vehicle.state(), VehicleState::default());
    }
}
