//! Safety override layer
//!
//! Two independent sources can veto or force output transitions, evaluated
//! before any ON transition and continuously while ON:
//! - opening (door/window) sensors pause climate output after their open
//!   timeout, scoped to configured HVAC modes
//! - a floor sensor clamps heating output between min/max floor bounds
//!
//! Precedence: opening override > floor override > room hysteresis.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use climate_config::{ControllerConfig, FloorConfig};
use climate_core::HvacMode;
use tracing::{debug, info, warn};

/// Floor-temperature clamp outcome for heat-type channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorClamp {
    /// Floor too hot: heating forced off
    ForceOff,
    /// Floor too cold: heating forced on
    ForceOn,
}

/// Override verdicts derived for one evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideState {
    pub openings_paused: bool,
    pub floor_clamp: Option<FloorClamp>,
}

#[derive(Debug, Default)]
struct OpeningState {
    is_open: bool,
    changed_at: Option<DateTime<Utc>>,
    // The pause stays engaged through the close timeout
    engaged: bool,
}

/// Tracks opening sensors and the floor temperature
#[derive(Debug)]
pub struct SafetyOverrides {
    openings: HashMap<String, OpeningState>,
    floor_temp: Option<f64>,
    floor_available: bool,
}

impl SafetyOverrides {
    /// Seed tracked openings from the configuration, all assumed closed
    pub fn new(config: &ControllerConfig) -> Self {
        let openings = config
            .openings
            .iter()
            .map(|o| (o.opening_id.clone(), OpeningState::default()))
            .collect();
        Self {
            openings,
            floor_temp: None,
            floor_available: false,
        }
    }

    /// Record an opening sensor change; unknown and repeated states are ignored
    pub fn set_opening(&mut self, opening_id: &str, is_open: bool, now: DateTime<Utc>) {
        let Some(state) = self.openings.get_mut(opening_id) else {
            debug!(opening_id, "ignoring state change for untracked opening");
            return;
        };
        if state.is_open == is_open && state.changed_at.is_some() {
            return;
        }
        state.is_open = is_open;
        state.changed_at = Some(now);
        info!(opening_id, is_open, "opening state changed");
    }

    pub fn update_floor_temperature(&mut self, value: Option<f64>) {
        match (value, self.floor_available) {
            (None, true) => warn!("floor temperature sensor unavailable"),
            (Some(_), false) => info!("floor temperature sensor available"),
            _ => {}
        }
        self.floor_available = value.is_some();
        self.floor_temp = value;
    }

    /// Derive this cycle's override verdicts
    ///
    /// The opening pause wins over the floor clamp: an engaged opening in
    /// scope suppresses the clamp entirely.
    pub fn derive(
        &mut self,
        config: &ControllerConfig,
        mode: HvacMode,
        now: DateTime<Utc>,
    ) -> OverrideState {
        let openings_paused = self.openings_paused(config, mode, now);
        let floor_clamp = if openings_paused {
            None
        } else {
            self.floor_clamp(&config.floor)
        };
        OverrideState {
            openings_paused,
            floor_clamp,
        }
    }

    fn openings_paused(&mut self, config: &ControllerConfig, mode: HvacMode, now: DateTime<Utc>) -> bool {
        let mut paused = false;
        for opening_cfg in &config.openings {
            let Some(state) = self.openings.get_mut(&opening_cfg.opening_id) else {
                continue;
            };
            if let Some(changed_at) = state.changed_at {
                let elapsed = now.signed_duration_since(changed_at);
                if state.is_open {
                    if !state.engaged && elapsed >= opening_cfg.timeout_open() {
                        info!(
                            opening_id = %opening_cfg.opening_id,
                            "opening open past timeout, pausing climate output"
                        );
                        state.engaged = true;
                    }
                } else if state.engaged && elapsed >= opening_cfg.timeout_close() {
                    info!(
                        opening_id = %opening_cfg.opening_id,
                        "opening closed past timeout, pause lifted"
                    );
                    state.engaged = false;
                }
            }
            paused |= state.engaged && opening_cfg.applies_to(mode);
        }
        paused
    }

    fn floor_clamp(&self, floor: &FloorConfig) -> Option<FloorClamp> {
        let temp = self.floor_temp?;
        if let Some(max) = floor.max_floor_temp {
            if temp >= max {
                return Some(FloorClamp::ForceOff);
            }
        }
        if let Some(min) = floor.min_floor_temp {
            if temp <= min {
                return Some(FloorClamp::ForceOn);
            }
        }
        None
    }
}
