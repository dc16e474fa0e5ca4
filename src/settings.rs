//! Run settings for the headless runner
//!
//! Loaded from a JSON file; every field has a default so an empty object is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::{Tuning, TuningError};

/// Run length presets. Both end by freezing the world in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunProfile {
    /// Three minute run, territory rotates every 45 s
    #[default]
    Full,
    /// One minute run, territory rotates every 15 s
    Sprint,
}

impl RunProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunProfile::Full => "Full",
            RunProfile::Sprint => "Sprint",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(RunProfile::Full),
            "sprint" | "short" => Some(RunProfile::Sprint),
            _ => None,
        }
    }

    /// Total run length in seconds
    pub fn run_seconds(&self) -> f32 {
        match self {
            RunProfile::Full => 180.0,
            RunProfile::Sprint => 60.0,
        }
    }

    /// Seconds spent in a territory before it auto-rotates
    pub fn rotate_seconds(&self) -> f32 {
        match self {
            RunProfile::Full => 45.0,
            RunProfile::Sprint => 15.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning override: {0}")]
    Tuning(#[from] TuningError),
}

/// Headless run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profile: RunProfile,
    /// Fixed seed; `None` derives one from the wall clock
    pub seed: Option<u64>,
    /// Optional JSON file overriding tuning values
    pub tuning_path: Option<PathBuf>,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Simulated wall-clock seconds to run for
    pub simulate_seconds: f32,
    /// Host frame rate used to feed the driver
    pub frame_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: RunProfile::Full,
            seed: None,
            tuning_path: None,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            simulate_seconds: 200.0,
            frame_rate: 60.0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&raw)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Resolve the tuning table: profile defaults, then the override file if any
    pub fn tuning(&self) -> Result<Tuning, SettingsError> {
        let Some(path) = &self.tuning_path else {
            return Ok(Tuning::for_profile(self.profile));
        };
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Tuning::from_json_over(
            &Tuning::for_profile(self.profile),
            &raw,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parsing() {
        assert_eq!(RunProfile::from_str("FULL"), Some(RunProfile::Full));
        assert_eq!(RunProfile::from_str("short"), Some(RunProfile::Sprint));
        assert_eq!(RunProfile::from_str("marathon"), None);
        assert_eq!(RunProfile::Sprint.as_str(), "Sprint");
    }

    #[test]
    fn empty_object_is_default() {
        let settings = Settings::from_json("{}").expect("empty settings parse");
        assert_eq!(settings.profile, RunProfile::Full);
        assert!(settings.seed.is_none());
        assert_eq!(settings.viewport_width, 1280.0);
    }

    #[test]
    fn profile_feeds_tuning() {
        let settings = Settings::from_json(r#"{ "profile": "sprint", "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        let tuning = settings.tuning().unwrap();
        assert_eq!(tuning.total_time, 60.0);
    }

    #[test]
    fn tuning_file_applies_over_profile() {
        let path = std::env::temp_dir().join(format!(
            "territory-run-tuning-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "world": { "base_speed": 6.0 } }"#).unwrap();
        let settings = Settings {
            profile: RunProfile::Sprint,
            tuning_path: Some(path.clone()),
            ..Settings::default()
        };
        let tuning = settings.tuning();
        let _ = fs::remove_file(&path);

        let tuning = tuning.unwrap();
        assert_eq!(tuning.total_time, 60.0);
        assert_eq!(tuning.auto_rotate_secs, 15.0);
        assert_eq!(tuning.world.base_speed, 6.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::load(Path::new("/nonexistent/territory-run.json")).unwrap_err();
        assert!(err.to_string().contains("territory-run.json"));
    }
}
