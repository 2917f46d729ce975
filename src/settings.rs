//! Player preferences
//!
//! Persisted in LocalStorage as JSON. Only preferences live here; the dig
//! site itself is never saved.

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

    /// Next preset up, wrapping back to Low
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }
}

/// Options the player can change from the HUD, one button each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsControl {
    Quality,
    Particles,
    ShowFps,
    ReducedMotion,
    HighContrast,
}

impl SettingsControl {
    pub const ALL: [SettingsControl; 5] = [
        SettingsControl::Quality,
        SettingsControl::Particles,
        SettingsControl::ShowFps,
        SettingsControl::ReducedMotion,
        SettingsControl::HighContrast,
    ];

    /// DOM id of the HUD button
    pub fn element_id(&self) -> &'static str {
        match self {
            SettingsControl::Quality => "set-quality",
            SettingsControl::Particles => "set-particles",
            SettingsControl::ShowFps => "set-fps",
            SettingsControl::ReducedMotion => "set-motion",
            SettingsControl::HighContrast => "set-contrast",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Dirt particle effects
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (nuggets drawn without spin or bob)
    pub reduced_motion: bool,
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            show_fps: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON, falling back to defaults on bad input.
    /// Missing fields take their default value.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Effective particle draw cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Cycle or flip one option
    pub fn adjust(&mut self, control: SettingsControl) {
        match control {
            SettingsControl::Quality => self.quality = self.quality.next(),
            SettingsControl::Particles => self.particles = !self.particles,
            SettingsControl::ShowFps => self.show_fps = !self.show_fps,
            SettingsControl::ReducedMotion => self.reduced_motion = !self.reduced_motion,
            SettingsControl::HighContrast => self.high_contrast = !self.high_contrast,
        }
    }

    /// Button caption showing the current value
    pub fn label(&self, control: SettingsControl) -> String {
        let on_off = |on: bool| if on { "on" } else { "off" };
        match control {
            SettingsControl::Quality => format!("Quality: {}", self.quality.as_str()),
            SettingsControl::Particles => format!("Dirt: {}", on_off(self.particles)),
            SettingsControl::ShowFps => format!("FPS: {}", on_off(self.show_fps)),
            SettingsControl::ReducedMotion => {
                format!("Reduced motion: {}", on_off(self.reduced_motion))
            }
            SettingsControl::HighContrast => {
                format!("High contrast: {}", on_off(self.high_contrast))
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "dig_deep_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"quality":"High","show_fps":false}"#);
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(!settings.show_fps);
        assert!(settings.particles);
        assert_eq!(settings.max_particles(), 1024);
    }

    #[test]
    fn test_bad_json_uses_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_particles_off_caps_to_zero() {
        let settings = Settings {
            particles: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_quality_cycles_through_presets() {
        let mut settings = Settings::from_preset(QualityPreset::Medium);
        settings.adjust(SettingsControl::Quality);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.max_particles(), 1024);
        settings.adjust(SettingsControl::Quality);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.label(SettingsControl::Quality), "Quality: Low");
    }

    #[test]
    fn test_toggles_flip_and_survive_json() {
        let mut settings = Settings::default();
        settings.adjust(SettingsControl::ReducedMotion);
        settings.adjust(SettingsControl::HighContrast);
        settings.adjust(SettingsControl::ShowFps);
        assert_eq!(settings.label(SettingsControl::ReducedMotion), "Reduced motion: on");
        assert_eq!(settings.label(SettingsControl::ShowFps), "FPS: off");

        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_control_ids_are_distinct() {
        let mut ids: Vec<&str> = SettingsControl::ALL.iter().map(|c| c.element_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SettingsControl::ALL.len());
    }
}
