//! Presentation and audio preferences
//!
//! Loaded from an optional JSON document; never written back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::MAX_FRAME_DT;
use crate::error::ConfigError;
use crate::sim::EnergyState;
use crate::tuning::merge;

/// Shell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Length of the music crossfade on a shift, in seconds
    pub crossfade_secs: f32,
    /// Track played in the low energy state
    pub low_track_url: String,
    /// Track played in the high energy state
    pub high_track_url: String,

    // === Frame loop ===
    /// Longest wall-clock step fed to the simulation
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            crossfade_secs: 1.4,
            low_track_url: "assets/audio/low_energy/Fever Dreams_lower energy.mp3".to_string(),
            high_track_url: "assets/audio/high_energy/Fever Dreams_higher energy.mp3".to_string(),
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Overlay a JSON document on the defaults and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        let settings: Self = serde_json::from_value(merged)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(ConfigError::OutOfRange {
                field: "music_volume",
                value: self.music_volume,
                expected: "in [0, 1]",
            });
        }
        if !(self.crossfade_secs.is_finite() && self.crossfade_secs >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "crossfade_secs",
                value: self.crossfade_secs,
                expected: ">= 0",
            });
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_frame_dt",
                value: self.max_frame_dt,
                expected: "> 0",
            });
        }
        Ok(())
    }

    /// Track URL for an energy state
    pub fn track_url(&self, energy_state: EnergyState) -> &str {
        match energy_state {
            EnergyState::Low => &self.low_track_url,
            EnergyState::High => &self.high_track_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.crossfade_secs, 1.4);
        assert_eq!(settings.max_frame_dt, 0.033);
        assert!(settings.track_url(EnergyState::High).ends_with("higher energy.mp3"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_json_overrides() {
        let settings =
            Settings::from_json(r#"{ "music_volume": 0.25, "low_track_url": "calm.ogg" }"#)
                .expect("valid settings");
        assert_eq!(settings.music_volume, 0.25);
        assert_eq!(settings.track_url(EnergyState::Low), "calm.ogg");
        assert_eq!(settings.crossfade_secs, 1.4);
    }

    #[test]
    fn test_from_json_rejects_out_of_range() {
        match Settings::from_json(r#"{ "music_volume": 3 }"#) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "music_volume"),
            other => panic!("expected out of range, got {other:?}"),
        }
        assert!(Settings::from_json(r#"{ "max_frame_dt": 0 }"#).is_err());
        assert!(Settings::from_json("[").is_err());
    }
}
