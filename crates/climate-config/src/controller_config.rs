//! Validated controller configuration
//!
//! The configuration wizard owns real validation; these structures only
//! re-check ranges defensively before the engine starts. Duration fields
//! are plain seconds in the serialized form and exposed as
//! `chrono::Duration` accessors for the engine.

use std::collections::HashMap;

use chrono::Duration;
use climate_core::{Channel, HvacMode};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Hysteresis band configuration
///
/// The legacy `cold_tolerance`/`hot_tolerance` pair is always present;
/// the mode-specific values are optional and independent of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Degrees below target before heating demand (legacy, all modes)
    pub cold_tolerance: f64,

    /// Degrees above target before cooling demand (legacy, all modes)
    pub hot_tolerance: f64,

    /// Symmetric band used while heating, overrides the legacy pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_tolerance: Option<f64>,

    /// Symmetric band used while cooling, overrides the legacy pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cool_tolerance: Option<f64>,
}

/// Permitted range for the mode-specific tolerances
pub const MODE_TOLERANCE_MIN: f64 = 0.1;
pub const MODE_TOLERANCE_MAX: f64 = 5.0;

impl ToleranceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.cold_tolerance <= 0.0 {
            return Err(invalid("cold_tolerance", "must be greater than zero"));
        }
        if self.hot_tolerance <= 0.0 {
            return Err(invalid("hot_tolerance", "must be greater than zero"));
        }
        for (key, value) in [
            ("heat_tolerance", self.heat_tolerance),
            ("cool_tolerance", self.cool_tolerance),
        ] {
            if let Some(v) = value {
                if !(MODE_TOLERANCE_MIN..=MODE_TOLERANCE_MAX).contains(&v) {
                    return Err(invalid(
                        key,
                        format!(
                            "must be between {MODE_TOLERANCE_MIN} and {MODE_TOLERANCE_MAX}"
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Humidity band for the dehumidifier channel (dry mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumidityConfig {
    /// Target relative humidity in percent
    pub target_humidity: f64,

    /// Percent above target before the dehumidifier starts
    #[serde(default = "default_humidity_tolerance")]
    pub moist_tolerance: f64,

    /// Percent below target before the dehumidifier stops
    #[serde(default = "default_humidity_tolerance")]
    pub dry_tolerance: f64,
}

fn default_humidity_tolerance() -> f64 {
    3.0
}

impl HumidityConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=100.0).contains(&self.target_humidity) {
            return Err(invalid("target_humidity", "must be between 0 and 100"));
        }
        if self.moist_tolerance <= 0.0 {
            return Err(invalid("moist_tolerance", "must be greater than zero"));
        }
        if self.dry_tolerance <= 0.0 {
            return Err(invalid("dry_tolerance", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Floor-temperature clamp bounds
///
/// Either bound may be absent; if both are present `min < max` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Below this floor reading, heating is forced on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_floor_temp: Option<f64>,

    /// Above this floor reading, heating is forced off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_floor_temp: Option<f64>,
}

impl FloorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let (Some(min), Some(max)) = (self.min_floor_temp, self.max_floor_temp) {
            if min >= max {
                return Err(invalid(
                    "min_floor_temp",
                    "must be below max_floor_temp",
                ));
            }
        }
        Ok(())
    }

    /// Whether any clamp bound is configured
    pub fn is_configured(&self) -> bool {
        self.min_floor_temp.is_some() || self.max_floor_temp.is_some()
    }
}

/// One tracked door/window sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningConfig {
    /// Identifier of the opening sensor entity
    pub opening_id: String,

    /// How long the opening must stay open before the pause engages
    #[serde(default)]
    pub timeout_open_secs: u64,

    /// How long the opening must stay closed before the pause lifts
    #[serde(default)]
    pub timeout_close_secs: u64,

    /// HVAC modes affected by this opening; empty means all modes
    #[serde(default)]
    pub scope: Vec<HvacMode>,
}

impl OpeningConfig {
    pub fn timeout_open(&self) -> Duration {
        Duration::seconds(self.timeout_open_secs as i64)
    }

    pub fn timeout_close(&self) -> Duration {
        Duration::seconds(self.timeout_close_secs as i64)
    }

    /// Whether this opening's pause applies in the given mode
    pub fn applies_to(&self, mode: HvacMode) -> bool {
        self.scope.is_empty() || self.scope.contains(&mode)
    }
}

/// Auxiliary-stage escalation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// How long the primary may run unsatisfied before the auxiliary engages
    pub escalation_timeout_secs: u64,
}

impl StageConfig {
    pub fn escalation_timeout(&self) -> Duration {
        Duration::seconds(self.escalation_timeout_secs as i64)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.escalation_timeout_secs == 0 {
            return Err(invalid(
                "escalation_timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// The complete validated configuration consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Equipment channels fitted on this thermostat
    pub channels: Vec<Channel>,

    /// Hysteresis bands
    pub tolerances: ToleranceConfig,

    /// Humidity band; required when a dehumidifier channel is fitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<HumidityConfig>,

    /// Default minimum time between transitions of any one output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cycle_duration_secs: Option<u64>,

    /// Per-channel overrides of the minimum cycle duration
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub min_cycle_overrides_secs: HashMap<Channel, u64>,

    /// Floor-temperature clamp
    #[serde(default)]
    pub floor: FloorConfig,

    /// Tracked door/window sensors
    #[serde(default)]
    pub openings: Vec<OpeningConfig>,

    /// Auxiliary-stage escalation; required when aux_heater is fitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageConfig>,
}

impl ControllerConfig {
    /// Defensive range re-checks over the already-wizard-validated config
    ///
    /// Any failure here is fatal: the engine refuses to run with undefined
    /// tolerance values rather than guess.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if self.channels[..i].contains(channel) {
                return Err(ConfigError::DuplicateChannel { channel: *channel });
            }
        }

        self.tolerances.validate()?;
        if let Some(humidity) = &self.humidity {
            humidity.validate()?;
        } else if self.channels.contains(&Channel::Dehumidifier) {
            return Err(invalid(
                "humidity",
                "required when a dehumidifier channel is fitted",
            ));
        }
        self.floor.validate()?;

        let mut seen = Vec::with_capacity(self.openings.len());
        for opening in &self.openings {
            if opening.opening_id.is_empty() {
                return Err(invalid("opening_id", "must not be empty"));
            }
            if seen.contains(&&opening.opening_id) {
                return Err(ConfigError::DuplicateOpening {
                    id: opening.opening_id.clone(),
                });
            }
            seen.push(&opening.opening_id);
        }

        let has_aux = self.channels.contains(&Channel::AuxHeater);
        match (&self.stage, has_aux) {
            (Some(stage), true) => {
                stage.validate()?;
                if !self.channels.contains(&Channel::Heater) {
                    return Err(ConfigError::AuxWithoutHeater);
                }
            }
            (Some(_), false) => return Err(ConfigError::StageWithoutAux),
            (None, true) => return Err(ConfigError::AuxWithoutStage),
            (None, false) => {}
        }

        Ok(())
    }

    /// Resolve the minimum cycle duration for a channel
    pub fn min_cycle_for(&self, channel: Channel) -> Option<Duration> {
        self.min_cycle_overrides_secs
            .get(&channel)
            .copied()
            .or(self.min_cycle_duration_secs)
            .map(|secs| Duration::seconds(secs as i64))
    }

    /// Look up an opening by id
    pub fn opening(&self, opening_id: &str) -> Option<&OpeningConfig> {
        self.openings.iter().find(|o| o.opening_id == opening_id)
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> ControllerConfig {
        ControllerConfig {
            channels: vec![Channel::Heater],
            tolerances: ToleranceConfig {
                cold_tolerance: 0.3,
                hot_tolerance: 0.3,
                heat_tolerance: None,
                cool_tolerance: None,
            },
            humidity: None,
            min_cycle_duration_secs: None,
            min_cycle_overrides_secs: HashMap::new(),
            floor: FloorConfig::default(),
            openings: Vec::new(),
            stage: None,
        }
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_legacy_tolerance() {
        let mut config = minimal_config();
        config.tolerances.cold_tolerance = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "cold_tolerance"
        ));
    }

    #[test]
    fn test_rejects_mode_tolerance_outside_range() {
        let mut config = minimal_config();
        config.tolerances.heat_tolerance = Some(0.05);
        assert!(config.validate().is_err());

        config.tolerances.heat_tolerance = Some(5.1);
        assert!(config.validate().is_err());

        config.tolerances.heat_tolerance = Some(0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_floor_bounds() {
        let mut config = minimal_config();
        config.floor = FloorConfig {
            min_floor_temp: Some(28.0),
            max_floor_temp: Some(5.0),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aux_requires_stage_and_heater() {
        let mut config = minimal_config();
        config.channels = vec![Channel::Heater, Channel::AuxHeater];
        assert_eq!(config.validate(), Err(ConfigError::AuxWithoutStage));

        config.stage = Some(StageConfig {
            escalation_timeout_secs: 600,
        });
        assert!(config.validate().is_ok());

        config.channels = vec![Channel::AuxHeater];
        assert_eq!(config.validate(), Err(ConfigError::AuxWithoutHeater));
    }

    #[test]
    fn test_stage_without_aux_rejected() {
        let mut config = minimal_config();
        config.stage = Some(StageConfig {
            escalation_timeout_secs: 600,
        });
        assert_eq!(config.validate(), Err(ConfigError::StageWithoutAux));
    }

    #[test]
    fn test_dehumidifier_requires_humidity_config() {
        let mut config = minimal_config();
        config.channels = vec![Channel::Dehumidifier];
        assert!(config.validate().is_err());

        config.humidity = Some(HumidityConfig {
            target_humidity: 50.0,
            moist_tolerance: 3.0,
            dry_tolerance: 3.0,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_opening_rejected() {
        let mut config = minimal_config();
        let opening = OpeningConfig {
            opening_id: "binary_sensor.balcony_door".to_string(),
            timeout_open_secs: 30,
            timeout_close_secs: 15,
            scope: Vec::new(),
        };
        config.openings = vec![opening.clone(), opening];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateOpening { .. })
        ));
    }

    #[test]
    fn test_min_cycle_override_wins_over_default() {
        let mut config = minimal_config();
        config.min_cycle_duration_secs = Some(300);
        config
            .min_cycle_overrides_secs
            .insert(Channel::Heater, 120);

        assert_eq!(
            config.min_cycle_for(Channel::Heater),
            Some(Duration::seconds(120))
        );
        assert_eq!(
            config.min_cycle_for(Channel::Cooler),
            Some(Duration::seconds(300))
        );

        config.min_cycle_duration_secs = None;
        assert_eq!(config.min_cycle_for(Channel::Cooler), None);
    }

    #[test]
    fn test_opening_scope_empty_means_all_modes() {
        let opening = OpeningConfig {
            opening_id: "binary_sensor.window".to_string(),
            timeout_open_secs: 0,
            timeout_close_secs: 0,
            scope: Vec::new(),
        };
        assert!(opening.applies_to(HvacMode::Heat));
        assert!(opening.applies_to(HvacMode::Dry));

        let scoped = OpeningConfig {
            scope: vec![HvacMode::Heat, HvacMode::HeatCool],
            ..opening
        };
        assert!(scoped.applies_to(HvacMode::Heat));
        assert!(!scoped.applies_to(HvacMode::Cool));
    }

    #[test]
    fn test_deserializes_from_yaml() {
        let yaml = r#"
channels: [heater, cooler]
tolerances:
  cold_tolerance: 0.3
  hot_tolerance: 0.3
  cool_tolerance: 2.0
min_cycle_duration_secs: 300
floor:
  min_floor_temp: 5.0
  max_floor_temp: 28.0
openings:
  - opening_id: binary_sensor.balcony_door
    timeout_open_secs: 30
    timeout_close_secs: 15
    scope: [heat, heat_cool]
"#;
        let config: ControllerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels, vec![Channel::Heater, Channel::Cooler]);
        assert_eq!(config.tolerances.cool_tolerance, Some(2.0));
        assert_eq!(
            config.min_cycle_for(Channel::Cooler),
            Some(Duration::seconds(300))
        );
        let opening = config.opening("binary_sensor.balcony_door").unwrap();
        assert_eq!(opening.timeout_open(), Duration::seconds(30));
        assert!(!opening.applies_to(HvacMode::Cool));
    }
}
