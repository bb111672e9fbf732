//! Best distance record
//!
//! Persisted to LocalStorage as a plain integer (meters).

use serde::{Deserialize, Serialize};

/// Best distance reached across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DistanceRecord {
    /// Meters, floored
    pub best: u32,
}

impl DistanceRecord {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "summit-best";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Whether a distance would beat the record
    pub fn qualifies(&self, distance: u32) -> bool {
        distance > self.best
    }

    /// Submit a finished run; returns true for a new record
    pub fn submit(&mut self, distance: u32) -> bool {
        if !self.qualifies(distance) {
            return false;
        }
        self.best = distance;
        true
    }

    /// Parse the stored representation, tolerating junk
    pub fn parse(stored: &str) -> Self {
        Self::new(stored.trim().parse().unwrap_or(0))
    }

    /// Load the record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(stored)) = storage.get_item(Self::STORAGE_KEY) {
                let record = Self::parse(&stored);
                log::info!("Loaded best distance {}m", record.best);
                return record;
            }
        }

        log::info!("No best distance found, starting fresh");
        Self::default()
    }

    /// Save the record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.best.to_string())
                .is_err()
            {
                log::warn!("Failed to save best distance");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_improvements() {
        let mut record = DistanceRecord::default();
        assert!(!record.submit(0));
        assert!(record.submit(120));
        assert!(!record.submit(120));
        assert!(!record.submit(80));
        assert_eq!(record.best, 120);
        assert!(record.submit(121));
        assert_eq!(record.best, 121);
    }

    #[test]
    fn test_parse_stored_value() {
        assert_eq!(DistanceRecord::parse("1234"), DistanceRecord::new(1234));
        assert_eq!(DistanceRecord::parse(" 42\n"), DistanceRecord::new(42));
        assert_eq!(DistanceRecord::parse("garbage"), DistanceRecord::new(0));
        assert_eq!(DistanceRecord::parse(""), DistanceRecord::new(0));
    }
}
