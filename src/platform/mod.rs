//! Platform layer
//!
//! The browser frontend lives in `web` (wasm32 only). Native builds only run
//! the headless binary; LocalStorage access sits next to the types it stores
//! (`records`, `settings`).

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasSurface, SummitGame};
