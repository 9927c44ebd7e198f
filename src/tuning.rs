//! Data-driven physics and energy economy
//!
//! Defaults reproduce the shipped balance. A JSON document can override any
//! subset of fields, nested profiles included:
//!
//! ```
//! use lucid_drift::Tuning;
//!
//! let tuning = Tuning::from_json(r#"{ "shift_interval": 8, "high": { "gravity": 2000 } }"#).unwrap();
//! assert_eq!(tuning.shift_interval, 8.0);
//! assert_eq!(tuning.high.gravity, 2000.0);
//! assert_eq!(tuning.high.drain_rate, 7.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::sim::EnergyState;

/// Physics and economy that differ between energy states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Multiplier on the base move speed
    pub move_speed_scale: f32,
    /// Energy lost per second while walking
    pub drain_rate: f32,
    /// Energy gained per second while standing still
    pub regen_rate: f32,
    /// Multiplier on every wraith's patrol speed
    pub enemy_speed_scale: f32,
    /// Score gained per second alive
    pub score_rate: f32,
}

impl EnergyProfile {
    pub fn low() -> Self {
        Self {
            gravity: 1050.0,
            move_speed_scale: 1.0,
            drain_rate: 5.0,
            regen_rate: 7.0,
            enemy_speed_scale: 1.0,
            score_rate: 12.0,
        }
    }

    pub fn high() -> Self {
        Self {
            gravity: 1700.0,
            move_speed_scale: 1.1,
            drain_rate: 7.0,
            regen_rate: 4.0,
            enemy_speed_scale: 1.6,
            score_rate: 18.0,
        }
    }
}

/// Every tunable constant of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_energy: f32,
    /// Seconds between timed shifts
    pub shift_interval: f32,
    /// Base horizontal speed (px/s)
    pub move_speed: f32,
    /// Initial upward speed of a jump (px/s)
    pub jump_speed: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Energy deducted when a dash starts
    pub dash_cost: f32,
    /// |axis| above this counts as walking
    pub move_threshold: f32,
    pub orb_energy: f32,
    pub orb_score: f32,
    /// Gap kept between the player and the side walls
    pub side_margin: f32,
    /// How far below the bottom edge a fall becomes fatal
    pub fall_out_depth: f32,
    pub ground_height: f32,
    pub low: EnergyProfile,
    pub high: EnergyProfile,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            shift_interval: 12.0,
            move_speed: 220.0,
            jump_speed: 520.0,
            dash_speed: 600.0,
            dash_duration: 0.18,
            dash_cooldown: 0.4,
            dash_cost: 18.0,
            move_threshold: 0.1,
            orb_energy: 20.0,
            orb_score: 120.0,
            side_margin: 8.0,
            fall_out_depth: 80.0,
            ground_height: 40.0,
            low: EnergyProfile::low(),
            high: EnergyProfile::high(),
        }
    }
}

impl Tuning {
    /// Profile for the active energy state
    #[inline]
    pub fn profile(&self, energy_state: EnergyState) -> &EnergyProfile {
        match energy_state {
            EnergyState::Low => &self.low,
            EnergyState::High => &self.high,
        }
    }

    /// Overlay a JSON document on the defaults and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        let tuning: Self = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_energy", self.max_energy)?;
        positive("shift_interval", self.shift_interval)?;
        positive("dash_duration", self.dash_duration)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("jump_speed", self.jump_speed)?;
        non_negative("dash_speed", self.dash_speed)?;
        non_negative("dash_cooldown", self.dash_cooldown)?;
        non_negative("dash_cost", self.dash_cost)?;
        non_negative("orb_energy", self.orb_energy)?;
        non_negative("orb_score", self.orb_score)?;
        non_negative("side_margin", self.side_margin)?;
        non_negative("fall_out_depth", self.fall_out_depth)?;
        non_negative("ground_height", self.ground_height)?;
        if !(0.0..1.0).contains(&self.move_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "move_threshold",
                value: self.move_threshold,
                expected: "in [0, 1)",
            });
        }
        validate_profile(&self.low, ["low.drain_rate", "low.regen_rate", "low.score_rate"])?;
        validate_profile(
            &self.high,
            ["high.drain_rate", "high.regen_rate", "high.score_rate"],
        )?;
        Ok(())
    }
}

fn validate_profile(profile: &EnergyProfile, fields: [&'static str; 3]) -> Result<(), ConfigError> {
    non_negative(fields[0], profile.drain_rate)?;
    non_negative(fields[1], profile.regen_rate)?;
    // Score must never go down while alive
    non_negative(fields[2], profile.score_rate)
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "> 0",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: ">= 0",
        })
    }
}

/// Recursively overlay `overrides` onto `base` (objects merge, leaves replace)
pub(crate) fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_shipped_balance() {
        let tuning = Tuning::default();
        assert_eq!(tuning.dash_cost, 18.0);
        assert_eq!(tuning.shift_interval, 12.0);
        assert_eq!(tuning.profile(EnergyState::High).gravity, 1700.0);
        assert_eq!(tuning.profile(EnergyState::Low).regen_rate, 7.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "dash_cost": 25, "low": { "drain_rate": 9.5 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.dash_cost, 25.0);
        assert_eq!(tuning.low.drain_rate, 9.5);
        // Untouched fields keep their defaults
        assert_eq!(tuning.low.regen_rate, 7.0);
        assert_eq!(tuning.high, EnergyProfile::high());
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        assert_eq!(Tuning::from_json("{}").unwrap(), Tuning::default());
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "max_energy": "lots" }"#),
            Err(ConfigError::Parse(_))
        ));
        match Tuning::from_json(r#"{ "shift_interval": 0 }"#) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "shift_interval"),
            other => panic!("expected out of range, got {other:?}"),
        }
        match Tuning::from_json(r#"{ "high": { "score_rate": -1 } }"#) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "high.score_rate"),
            other => panic!("expected out of range, got {other:?}"),
        }
    }
}
