//! Settings management

use glide_net::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("publish rate must be at least 1 Hz")]
    InvalidPublishRate,

    #[error("frame rate must be at least 1 Hz")]
    InvalidFrameRate,
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sync: SyncConfig,
    /// Render ticks per second
    pub frame_rate_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            frame_rate_hz: 60,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.sync.publish_rate_hz == 0 {
            return Err(SettingsError::InvalidPublishRate);
        }
        if self.frame_rate_hz == 0 {
            return Err(SettingsError::InvalidFrameRate);
        }
        Ok(())
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate_hz.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load("/nonexistent/glide/settings.json").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sync.publish_rate_hz, 30);
    }

    #[test]
    fn test_nested_overrides() {
        let settings = Settings::from_json(
            r#"{"sync": {"state_addr": "10.0.0.2:25000", "tracked_entity": 2}, "frame_rate_hz": 120}"#,
        )
        .unwrap();

        assert_eq!(settings.sync.state_addr, "10.0.0.2:25000");
        assert_eq!(settings.sync.tracked_entity, 2);
        assert_eq!(settings.sync.input_addr, "localhost:25001");
        assert_eq!(settings.frame_rate_hz, 120);
    }

    #[test]
    fn test_rejects_zero_rates() {
        assert!(matches!(
            Settings::from_json(r#"{"sync": {"publish_rate_hz": 0}}"#),
            Err(SettingsError::InvalidPublishRate)
        ));
        assert!(matches!(
            Settings::from_json(r#"{"frame_rate_hz": 0}"#),
            Err(SettingsError::InvalidFrameRate)
        ));
        assert!(matches!(
            Settings::from_json("{"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let text = serde_json::to_string_pretty(&Settings::default()).unwrap();
        assert_eq!(Settings::from_json(&text).unwrap(), Settings::default());
    }
}
