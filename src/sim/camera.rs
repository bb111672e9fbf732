//! Follow camera with velocity lookahead
//!
//! Frame-rate independent smoothing: after one second of chasing a fixed
//! target only `retention` of the starting gap remains.

use glam::Vec2;

use super::vehicle::VehicleState;
use crate::Viewport;
use crate::tuning::CameraTuning;

/// Screen anchor of the camera point, as a fraction of the viewport
pub const SCREEN_ANCHOR: Vec2 = Vec2::new(0.3, 0.5);

#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: Vec2,
    tuning: CameraTuning,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraTuning::default())
    }
}

impl Camera {
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            tuning,
        }
    }

    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
    }

    /// Point the camera is chasing for a given vehicle
    pub fn target_for(&self, vehicle: &VehicleState) -> Vec2 {
        let lookahead = (vehicle.vel.x * self.tuning.lookahead).max(0.0);
        Vec2::new(vehicle.pos.x + lookahead, vehicle.pos.y - self.tuning.lift)
    }

    pub fn update(&mut self, dt: f32, vehicle: &VehicleState) {
        let target = self.target_for(vehicle);

        // Faster horizontally, gentler vertically
        let lerp_x = 1.0 - self.tuning.retention_x.powf(dt);
        let lerp_y = 1.0 - self.tuning.retention_y.powf(dt);

        self.pos.x += (target.x - self.pos.x) * lerp_x;
        self.pos.y += (target.y - self.pos.y) * lerp_y;
    }

    /// Translation mapping world space to screen space
    pub fn world_offset(&self, viewport: Viewport) -> Vec2 {
        Vec2::new(
            -self.pos.x + viewport.width * SCREEN_ANCHOR.x,
            -self.pos.y + viewport.height * SCREEN_ANCHOR.y,
        )
    }

    /// Horizontal world span worth drawing: half a view behind, one and a
    /// half ahead
    pub fn visible_span(&self, viewport: Viewport) -> (f32, f32) {
        (
            self.pos.x - viewport.width * 0.5,
            self.pos.x + viewport.width * 1.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(x: f32, y: f32, vx: f32) -> VehicleState {
        VehicleState {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, 0.0),
            angle: 0.0,
            grounded: true,
        }
    }

    #[test]
    fn test_target_lookahead() {
        let camera = Camera::default();
        assert_eq!(camera.target_for(&vehicle(100.0, 300.0, 200.0)), Vec2::new(180.0, 250.0));
        // No lookahead when reversing
        assert_eq!(camera.target_for(&vehicle(100.0, 300.0, -200.0)), Vec2::new(100.0, 250.0));
    }

    #[test]
    fn test_one_second_retention() {
        let mut camera = Camera::default();
        let v = vehicle(1000.0, 550.0, 0.0);
        camera.update(1.0, &v);
        assert!((camera.pos.x - 1000.0 * 0.98).abs() < 1e-2);
        assert!((camera.pos.y - 500.0 * 0.95).abs() < 1e-2);
    }

    #[test]
    fn test_converges_and_zero_dt_is_noop() {
        let mut camera = Camera::default();
        let v = vehicle(400.0, 350.0, 0.0);
        camera.update(0.0, &v);
        assert_eq!(camera.pos, Vec2::ZERO);
        for _ in 0..600 {
            camera.update(1.0 / 60.0, &v);
        }
        assert!((camera.pos - Vec2::new(400.0, 300.0)).length() < 0.1);
    }

    #[test]
    fn test_world_offset_anchors_camera() {
        let mut camera = Camera::default();
        camera.pos = Vec2::new(500.0, 200.0);
        let offset = camera.world_offset(Viewport::new(1000.0, 600.0));
        assert_eq!(offset, Vec2::new(-200.0, 100.0));
        assert_eq!(camera.visible_span(Viewport::new(1000.0, 600.0)), (0.0, 2000.0));
    }
}
