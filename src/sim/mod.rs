//! Frame-driven simulation
//!
//! Everything here is deterministic for a given seed and frame sequence:
//! - Seeded RNG only
//! - Variable `dt`, clamped once by the session
//! - No rendering or platform dependencies

pub mod camera;
pub mod fuel;
pub mod particles;
pub mod session;
pub mod terrain;
pub mod vehicle;

pub use camera::{Camera, SCREEN_ANCHOR};
pub use fuel::{CollectEffect, FuelCan, FuelGauge, FuelSystem};
pub use particles::{DUST_COLORS, Particle, ParticlePool};
pub use session::{Phase, RunSummary, Session};
pub use terrain::{SamplePoint, Terrain, height_function, progress_at};
pub use vehicle::{DriveInput, ExternalVehicle, TerrainFollower, Vehicle, VehicleState};
