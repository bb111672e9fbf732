//! Data-driven game balance
//!
//! Every feel-tuned constant of the fuel, dust and camera systems. Defaults
//! are the shipped values; a JSON document may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("spawn bands out of order: near band ends at {near}m, mid band at {mid}m")]
    BandOrder { near: f32, mid: f32 },
    #[error("camera retention `{field}` must be in (0, 1), got {value}")]
    Retention { field: &'static str, value: f32 },
}

/// Random spacing between fuel cans for one distance band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    /// Minimum spacing (meters)
    pub base: f32,
    /// Random extra spacing on top of `base` (meters)
    pub spread: f32,
}

/// Distance bands that make fuel cans sparser the farther you get
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSchedule {
    /// First can distance after a reset (meters)
    pub first_can_m: f32,
    /// Near band applies below this distance (meters)
    pub near_until_m: f32,
    /// Mid band applies below this distance (meters)
    pub mid_until_m: f32,
    pub near: SpawnBand,
    pub mid: SpawnBand,
    pub far: SpawnBand,
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self {
            first_can_m: 100.0,
            near_until_m: 500.0,
            mid_until_m: 1500.0,
            near: SpawnBand {
                base: 150.0,
                spread: 50.0,
            },
            mid: SpawnBand {
                base: 250.0,
                spread: 100.0,
            },
            far: SpawnBand {
                base: 350.0,
                spread: 150.0,
            },
        }
    }
}

impl SpawnSchedule {
    /// Band governing the spacing after a can placed at `distance_m`
    pub fn band_for(&self, distance_m: f32) -> SpawnBand {
        if distance_m < self.near_until_m {
            self.near
        } else if distance_m < self.mid_until_m {
            self.mid
        } else {
            self.far
        }
    }
}

/// Fuel tank and fuel can balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTuning {
    pub max_fuel: f32,
    /// Drain per second while driving (~50s on a full tank)
    pub drive_drain: f32,
    /// Drain per second while idle
    pub idle_drain: f32,
    /// Horizontal speed above which the vehicle counts as driving
    pub driving_speed: f32,
    pub can_refill: f32,
    /// Pickup detection radius (generous, ~1.5x the visual can)
    pub pickup_radius: f32,
    pub can_size: f32,
    /// Gap between the can's base and the surface
    pub can_lift: f32,
    pub collect_fx_duration: f32,
    /// Cans this far behind the vehicle are dropped (world units)
    pub cleanup_distance: f32,
    pub schedule: SpawnSchedule,
}

impl Default for FuelTuning {
    fn default() -> Self {
        Self {
            max_fuel: 100.0,
            drive_drain: 2.0,
            idle_drain: 0.5,
            driving_speed: 10.0,
            can_refill: 30.0,
            pickup_radius: 50.0,
            can_size: 22.0,
            can_lift: 2.0,
            collect_fx_duration: 0.6,
            cleanup_distance: 500.0,
            schedule: SpawnSchedule::default(),
        }
    }
}

/// Dust particle balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub max_particles: usize,
    /// Nominal particle lifetime (seconds); also the alpha reference
    pub lifetime: f32,
    /// Seconds between dust puffs
    pub spawn_interval: f32,
    /// Horizontal speed above which a grounded vehicle kicks up dust
    pub min_speed: f32,
    /// Distance behind the vehicle's reference point along its facing
    pub rear_offset: f32,
    /// Full width of the positional jitter box
    pub jitter_x: f32,
    pub jitter_y: f32,
    /// Fraction of vehicle speed thrown backwards
    pub velocity_carry: f32,
    /// Full width of horizontal velocity jitter
    pub velocity_jitter: f32,
    pub rise_speed_min: f32,
    pub rise_speed_spread: f32,
    /// Lifetime is scaled by `life_min + r * life_spread`
    pub life_min: f32,
    pub life_spread: f32,
    pub radius_min: f32,
    pub radius_spread: f32,
    /// Upward acceleration (units/s²)
    pub drift: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            max_particles: 20,
            lifetime: 0.6,
            spawn_interval: 0.03,
            min_speed: 30.0,
            rear_offset: 30.0,
            jitter_x: 10.0,
            jitter_y: 5.0,
            velocity_carry: 0.1,
            velocity_jitter: 20.0,
            rise_speed_min: 10.0,
            rise_speed_spread: 30.0,
            life_min: 0.7,
            life_spread: 0.3,
            radius_min: 3.0,
            radius_spread: 5.0,
            drift: 20.0,
        }
    }
}

/// Follow camera feel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Seconds of forward velocity to look ahead
    pub lookahead: f32,
    /// Keep the vehicle this far above the view center
    pub lift: f32,
    /// Fraction of the horizontal gap left after one second
    pub retention_x: f32,
    /// Fraction of the vertical gap left after one second
    pub retention_y: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            lookahead: 0.4,
            lift: 50.0,
            retention_x: 0.02,
            retention_y: 0.05,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub fuel: FuelTuning,
    pub particles: ParticleTuning,
    pub camera: CameraTuning,
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

fn retention(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(TuningError::Retention { field, value })
    }
}

impl Tuning {
    /// Parse and validate a JSON document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or destabilise the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let f = &self.fuel;
        positive("fuel.max_fuel", f.max_fuel)?;
        non_negative("fuel.drive_drain", f.drive_drain)?;
        non_negative("fuel.idle_drain", f.idle_drain)?;
        non_negative("fuel.driving_speed", f.driving_speed)?;
        non_negative("fuel.can_refill", f.can_refill)?;
        non_negative("fuel.pickup_radius", f.pickup_radius)?;
        positive("fuel.can_size", f.can_size)?;
        non_negative("fuel.can_lift", f.can_lift)?;
        positive("fuel.collect_fx_duration", f.collect_fx_duration)?;
        non_negative("fuel.cleanup_distance", f.cleanup_distance)?;

        let s = &f.schedule;
        non_negative("fuel.schedule.first_can_m", s.first_can_m)?;
        // A zero-width band would make the spawn loop spin forever
        positive("fuel.schedule.near.base", s.near.base)?;
        positive("fuel.schedule.mid.base", s.mid.base)?;
        positive("fuel.schedule.far.base", s.far.base)?;
        non_negative("fuel.schedule.near.spread", s.near.spread)?;
        non_negative("fuel.schedule.mid.spread", s.mid.spread)?;
        non_negative("fuel.schedule.far.spread", s.far.spread)?;
        if s
            .near_until_m
            .partial_cmp(&s.mid_until_m)
            .is_none_or(|order| order.is_gt())
        {
            return Err(TuningError::BandOrder {
                near: s.near_until_m,
                mid: s.mid_until_m,
            });
        }

        let p = &self.particles;
        if p.max_particles == 0 {
            return Err(TuningError::NotPositive {
                field: "particles.max_particles",
                value: 0.0,
            });
        }
        positive("particles.lifetime", p.lifetime)?;
        positive("particles.spawn_interval", p.spawn_interval)?;
        non_negative("particles.min_speed", p.min_speed)?;
        non_negative("particles.rear_offset", p.rear_offset)?;
        positive("particles.life_min", p.life_min)?;
        non_negative("particles.life_spread", p.life_spread)?;
        positive("particles.radius_min", p.radius_min)?;
        non_negative("particles.radius_spread", p.radius_spread)?;
        non_negative("particles.drift", p.drift)?;

        let c = &self.camera;
        non_negative("camera.lookahead", c.lookahead)?;
        retention("camera.retention_x", c.retention_x)?;
        retention("camera.retention_y", c.retention_y)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = Tuning::default().to_json().unwrap();
        let parsed = Tuning::from_json(&json).unwrap();
        assert_eq!(parsed, Tuning::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "fuel": { "can_refill": 45.0 } }"#).unwrap();
        assert_eq!(tuning.fuel.can_refill, 45.0);
        assert_eq!(tuning.fuel.max_fuel, 100.0);
        assert_eq!(tuning.particles, ParticleTuning::default());
    }

    #[test]
    fn test_rejects_zero_spawn_band() {
        let err = Tuning::from_json(r#"{ "fuel": { "schedule": { "far": { "base": 0.0, "spread": 10.0 } } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "fuel.schedule.far.base",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_bands() {
        let mut tuning = Tuning::default();
        tuning.fuel.schedule.near_until_m = 2000.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BandOrder { .. })));
    }

    #[test]
    fn test_rejects_bad_retention() {
        let mut tuning = Tuning::default();
        tuning.camera.retention_y = 1.0;
        assert!(matches!(tuning.validate(), Err(TuningError::Retention { .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = Tuning::from_json(r#"{ "particles": { "max_particles": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "particles.max_particles",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::from_file("/nonexistent/summit-tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_band_selection() {
        let schedule = SpawnSchedule::default();
        assert_eq!(schedule.band_for(100.0), schedule.near);
        assert_eq!(schedule.band_for(500.0), schedule.mid);
        assert_eq!(schedule.band_for(1499.0), schedule.mid);
        assert_eq!(schedule.band_for(9000.0), schedule.far);
    }
}
