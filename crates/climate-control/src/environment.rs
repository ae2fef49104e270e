//! Environment tracker
//!
//! Owns the current/target temperature, humidity and HVAC mode, and
//! answers the "is it too cold / too hot / too moist" verdicts by
//! delegating to the tolerance selector. Unknown readings make every
//! verdict false: a failed sensor never energizes equipment.

use climate_config::{HumidityConfig, ToleranceConfig};
use climate_core::{HvacMode, TargetTemp};
use tracing::{info, warn};

use crate::tolerance;

/// Mutable environment state owned by the controller
#[derive(Debug)]
pub struct EnvironmentTracker {
    tolerances: ToleranceConfig,
    humidity_cfg: Option<HumidityConfig>,

    current_temp: Option<f64>,
    target_temp: Option<f64>,
    target_temp_low: Option<f64>,
    target_temp_high: Option<f64>,
    current_humidity: Option<f64>,
    hvac_mode: HvacMode,

    // Latch so unavailability is logged on the edge, not every cycle
    temp_available: bool,
    humidity_available: bool,
}

impl EnvironmentTracker {
    pub fn new(tolerances: ToleranceConfig, humidity_cfg: Option<HumidityConfig>) -> Self {
        Self {
            tolerances,
            humidity_cfg,
            current_temp: None,
            target_temp: None,
            target_temp_low: None,
            target_temp_high: None,
            current_humidity: None,
            hvac_mode: HvacMode::Off,
            temp_available: false,
            humidity_available: false,
        }
    }

    pub fn hvac_mode(&self) -> HvacMode {
        self.hvac_mode
    }

    pub fn current_temp(&self) -> Option<f64> {
        self.current_temp
    }

    /// Mode changes take effect on the very next evaluation
    pub fn set_hvac_mode(&mut self, mode: HvacMode) {
        if self.hvac_mode != mode {
            info!(from = %self.hvac_mode, to = %mode, "HVAC mode changed");
            self.hvac_mode = mode;
        }
    }

    pub fn update_temperature(&mut self, value: Option<f64>) {
        match (value, self.temp_available) {
            (None, true) => warn!("temperature sensor unavailable"),
            (Some(_), false) => info!("temperature sensor available"),
            _ => {}
        }
        self.temp_available = value.is_some();
        self.current_temp = value;
    }

    pub fn update_humidity(&mut self, value: Option<f64>) {
        match (value, self.humidity_available) {
            (None, true) => warn!("humidity sensor unavailable"),
            (Some(_), false) => info!("humidity sensor available"),
            _ => {}
        }
        self.humidity_available = value.is_some();
        self.current_humidity = value;
    }

    /// Replace the setpoint; a single target clears any range and vice versa
    pub fn update_target(&mut self, target: TargetTemp) {
        match target {
            TargetTemp::Single(value) => {
                self.target_temp = Some(value);
                self.target_temp_low = None;
                self.target_temp_high = None;
            }
            TargetTemp::Range { low, high } => {
                self.target_temp = None;
                self.target_temp_low = Some(low);
                self.target_temp_high = Some(high);
            }
        }
    }

    /// The setpoint heating works toward (range lower bound when set)
    fn heat_target(&self) -> Option<f64> {
        self.target_temp.or(self.target_temp_low)
    }

    /// The setpoint cooling works toward (range upper bound when set)
    fn cool_target(&self) -> Option<f64> {
        self.target_temp.or(self.target_temp_high)
    }

    /// Single point used for the heat/cool regime comparison: the single
    /// setpoint, or the midpoint of the range
    fn reference_target(&self) -> Option<f64> {
        self.target_temp.or(match (self.target_temp_low, self.target_temp_high) {
            (Some(low), Some(high)) => Some((low + high) / 2.0),
            _ => None,
        })
    }

    fn active_band(&self) -> (f64, f64) {
        tolerance::select(
            self.hvac_mode,
            &self.tolerances,
            self.current_temp,
            self.reference_target(),
        )
    }

    /// Heating demand: target >= current + cold_tolerance
    pub fn is_too_cold(&self) -> bool {
        let (Some(current), Some(target)) = (self.current_temp, self.heat_target()) else {
            return false;
        };
        let (cold_tol, _) = self.active_band();
        target >= current + cold_tol
    }

    /// Cooling demand: current >= target + hot_tolerance
    pub fn is_too_hot(&self) -> bool {
        let (Some(current), Some(target)) = (self.current_temp, self.cool_target()) else {
            return false;
        };
        let (_, hot_tol) = self.active_band();
        current >= target + hot_tol
    }

    /// Heating satisfied: current has overshot the heating setpoint by
    /// hot_tolerance. Identical to [`Self::is_too_hot`] with a single
    /// setpoint; with a range it compares against the lower bound so the
    /// heater releases without waiting for the cooling threshold.
    pub fn is_heating_satisfied(&self) -> bool {
        let (Some(current), Some(target)) = (self.current_temp, self.heat_target()) else {
            return false;
        };
        let (_, hot_tol) = self.active_band();
        current >= target + hot_tol
    }

    /// Cooling satisfied: current has undershot the cooling setpoint by
    /// cold_tolerance. Identical to [`Self::is_too_cold`] with a single
    /// setpoint; with a range it compares against the upper bound.
    pub fn is_cooling_satisfied(&self) -> bool {
        let (Some(current), Some(target)) = (self.current_temp, self.cool_target()) else {
            return false;
        };
        let (cold_tol, _) = self.active_band();
        target >= current + cold_tol
    }

    /// Dehumidify demand: humidity at or above target + moist_tolerance
    pub fn is_too_moist(&self) -> bool {
        let (Some(cfg), Some(humidity)) = (self.humidity_cfg.as_ref(), self.current_humidity)
        else {
            return false;
        };
        humidity >= cfg.target_humidity + cfg.moist_tolerance
    }

    /// Dehumidify satisfied: humidity at or below target - dry_tolerance
    pub fn is_dry_enough(&self) -> bool {
        let (Some(cfg), Some(humidity)) = (self.humidity_cfg.as_ref(), self.current_humidity)
        else {
            return false;
        };
        humidity <= cfg.target_humidity - cfg.dry_tolerance
    }
}
