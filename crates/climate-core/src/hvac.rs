//! HVAC operating modes and equipment channels

use serde::{Deserialize, Serialize};

/// The operating mode selected on the thermostat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Heat to the target temperature
    Heat,
    /// Cool to the target temperature
    Cool,
    /// Maintain a temperature range (heating and cooling)
    HeatCool,
    /// Circulate air without conditioning it
    FanOnly,
    /// Reduce humidity
    Dry,
    /// All equipment off
    #[default]
    Off,
}

impl HvacMode {
    /// String form matching the state value used by the climate domain
    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::HeatCool => "heat_cool",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Dry => "dry",
            HvacMode::Off => "off",
        }
    }
}

impl std::fmt::Display for HvacMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One controlled equipment output
///
/// The engine holds a fixed set of channels rather than inspecting at
/// runtime which outputs exist; a controller is constructed with the
/// channels that are actually fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Heater,
    Cooler,
    Fan,
    Dehumidifier,
    AuxHeater,
}

impl Channel {
    /// String form used in transition records and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Heater => "heater",
            Channel::Cooler => "cooler",
            Channel::Fan => "fan",
            Channel::Dehumidifier => "dehumidifier",
            Channel::AuxHeater => "aux_heater",
        }
    }

    /// Whether this channel adds heat (subject to the floor-temperature clamp)
    pub fn is_heat_type(&self) -> bool {
        matches!(self, Channel::Heater | Channel::AuxHeater)
    }

    /// The modes in which this channel participates at all
    pub fn serves_mode(&self, mode: HvacMode) -> bool {
        match self {
            Channel::Heater | Channel::AuxHeater => {
                matches!(mode, HvacMode::Heat | HvacMode::HeatCool)
            }
            Channel::Cooler => matches!(mode, HvacMode::Cool | HvacMode::HeatCool),
            Channel::Fan => matches!(mode, HvacMode::FanOnly),
            Channel::Dehumidifier => matches!(mode, HvacMode::Dry),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
