//! Player preferences
//!
//! Persisted separately from the best distance in LocalStorage. Settings only
//! change what is drawn, never the simulation.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Next preset in the cycle (wraps from High to Low)
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Whether to render the star field
    pub fn starfield_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }

    /// Number of parallax mountain layers to draw (nearest first)
    pub fn parallax_layers(&self) -> usize {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 3,
            QualityPreset::High => 3,
        }
    }

    /// Whether to stroke the underground texture stripes
    pub fn dirt_texture(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => false,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Dust particles
    pub particles: bool,
    /// Fuel pickup rings
    pub pickup_effects: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            pickup_effects: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops per-frame effects for slow devices
        if preset == QualityPreset::Low {
            self.pickup_effects = false;
        }
    }

    /// Switch preset and persist; returns whether anything changed
    pub fn set_quality(&mut self, preset: QualityPreset) -> bool {
        let before = self.clone();
        self.apply_preset(preset);
        if *self == before {
            return false;
        }
        self.save();
        true
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "summit_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_low_preset_trims_effects() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.pickup_effects);
        assert!(!settings.quality.starfield_enabled());
        assert_eq!(settings.quality.parallax_layers(), 1);
    }

    #[test]
    fn test_preset_cycle_wraps() {
        let mut preset = QualityPreset::Low;
        let mut seen = Vec::new();
        for _ in 0..3 {
            preset = preset.next();
            seen.push(preset);
        }
        assert_eq!(
            seen,
            [QualityPreset::Medium, QualityPreset::High, QualityPreset::Low]
        );
    }

    #[test]
    fn test_set_quality_reports_change() {
        let mut settings = Settings::default();
        assert!(!settings.set_quality(QualityPreset::Medium));
        assert!(settings.set_quality(QualityPreset::Low));
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.pickup_effects);
        assert!(!settings.set_quality(QualityPreset::Low));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "quality": "High" }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
        assert!(settings.quality.dirt_texture());
    }
}
