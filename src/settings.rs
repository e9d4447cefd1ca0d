//! Physics and playback settings
//!
//! Loaded from a JSON file next to the levels; every field falls back to its
//! default so partial files are fine.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{PhysicsParams, SingularPolicy};

/// Named force-constant tunings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ForceTuning {
    #[default]
    #[value(alias = "default")]
    Classic,
    Soft,
}

impl ForceTuning {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForceTuning::Classic => "Classic",
            ForceTuning::Soft => "Soft",
        }
    }

    /// Coulomb constant for this tuning
    pub fn coulomb_constant(&self) -> f32 {
        match self {
            ForceTuning::Classic => COULOMB_CONSTANT,
            ForceTuning::Soft => COULOMB_CONSTANT_SOFT,
        }
    }
}

/// Simulation and playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Simulation ticks per simulated second
    pub tick_rate: f32,
    /// Named tuning used when `coulomb_constant` is not given
    pub tuning: ForceTuning,
    /// Explicit force constant, overrides `tuning`
    pub coulomb_constant: Option<f32>,
    /// Handling of coincident orbs
    pub singular_policy: SingularPolicy,

    // === Playback ===
    /// Ticks per rendered frame at normal speed
    pub ticks_per_frame: u32,
    /// Rendered frames per second
    pub frame_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            tuning: ForceTuning::Classic,
            coulomb_constant: None,
            singular_policy: SingularPolicy::Skip,
            ticks_per_frame: TICKS_PER_FRAME,
            frame_rate: FRAME_RATE,
        }
    }
}

impl Settings {
    /// Create settings from a tuning (other fields default)
    pub fn from_tuning(tuning: ForceTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    /// Effective force constant
    pub fn coulomb_constant(&self) -> f32 {
        self.coulomb_constant
            .unwrap_or_else(|| self.tuning.coulomb_constant())
    }

    /// Physics parameters for loading a level
    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            tick_rate: self.tick_rate,
            coulomb_constant: self.coulomb_constant(),
            singular: self.singular_policy,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults when the file
    /// is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_rate, 60.0);
        assert_eq!(settings.ticks_per_frame, 8);
        assert_eq!(settings.coulomb_constant(), 10_000.0);
        assert_eq!(settings.singular_policy, SingularPolicy::Skip);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"tuning": "soft", "ticks_per_frame": 4}"#).unwrap();
        assert_eq!(settings.coulomb_constant(), 4_000.0);
        assert_eq!(settings.ticks_per_frame, 4);
        assert_eq!(settings.tick_rate, 60.0);
    }

    #[test]
    fn test_explicit_constant_overrides_tuning() {
        let settings = Settings::from_json(
            r#"{"tuning": "soft", "coulomb_constant": 2500,
                "singular_policy": {"kind": "clamp", "min_distance": 4}}"#,
        )
        .unwrap();
        let physics = settings.physics();
        assert_eq!(physics.coulomb_constant, 2_500.0);
        assert_eq!(physics.singular, SingularPolicy::Clamp { min_distance: 4.0 });
    }

    #[test]
    fn test_tuning_names() {
        assert_eq!(ForceTuning::from_str("SOFT", true), Ok(ForceTuning::Soft));
        assert_eq!(ForceTuning::from_str("default", true), Ok(ForceTuning::Classic));
        assert!(ForceTuning::from_str("hard", true).is_err());
        assert_eq!(ForceTuning::Soft.as_str(), "Soft");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/polarity-settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("polarity-settings-{}.json", std::process::id()));
        let settings = Settings {
            tick_rate: 120.0,
            ..Settings::from_tuning(ForceTuning::Soft)
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
