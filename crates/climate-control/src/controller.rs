//! The climate controller
//!
//! One explicit struct owns every component instance (environment tracker,
//! per-channel outputs, safety overrides, stage sequencer, driver seam) and
//! runs the whole evaluation synchronously per incoming event. There is no
//! process-wide mutable state; a host constructs one controller per
//! configured thermostat.

use chrono::{DateTime, Utc};
use climate_config::{ConfigResult, ControllerConfig};
use climate_core::{Channel, ClimateEvent, HvacMode, ReasonCode, TransitionRecord};
use tracing::warn;

use crate::activation::{CommandAction, Decision, DeviceOutput};
use crate::driver::OutputDriver;
use crate::environment::EnvironmentTracker;
use crate::overrides::{FloorClamp, OverrideState, SafetyOverrides};
use crate::sequencer::{StageSequencer, StageState};

/// Fixed command-issue order: the auxiliary stage always before its
/// primary, so staged deactivation happens in reverse order of activation.
const ISSUE_ORDER: [Channel; 5] = [
    Channel::AuxHeater,
    Channel::Heater,
    Channel::Cooler,
    Channel::Fan,
    Channel::Dehumidifier,
];

/// Room verdicts computed once per evaluation pass
#[derive(Debug, Clone, Copy)]
struct Verdicts {
    too_cold: bool,
    too_hot: bool,
    heating_satisfied: bool,
    cooling_satisfied: bool,
    too_moist: bool,
    dry_enough: bool,
}

/// Per-thermostat decision engine
pub struct ClimateController {
    config: ControllerConfig,
    environment: EnvironmentTracker,
    outputs: Vec<DeviceOutput>,
    overrides: SafetyOverrides,
    sequencer: Option<StageSequencer>,
    driver: Box<dyn OutputDriver>,
    log: Vec<TransitionRecord>,
}

impl ClimateController {
    /// Build a controller from a validated configuration
    ///
    /// Runs the defensive range re-checks; an invalid configuration is
    /// fatal here, the engine never runs with undefined tolerances.
    pub fn new(config: ControllerConfig, driver: Box<dyn OutputDriver>) -> ConfigResult<Self> {
        config.validate()?;

        let environment =
            EnvironmentTracker::new(config.tolerances.clone(), config.humidity.clone());
        let outputs = ISSUE_ORDER
            .iter()
            .filter(|channel| config.channels.contains(channel))
            .map(|channel| DeviceOutput::new(*channel, config.min_cycle_for(*channel)))
            .collect();
        let overrides = SafetyOverrides::new(&config);
        let sequencer = config
            .stage
            .as_ref()
            .map(|stage| StageSequencer::new(stage.escalation_timeout()));

        Ok(Self {
            config,
            environment,
            outputs,
            overrides,
            sequencer,
            driver,
            log: Vec::new(),
        })
    }

    /// Process one event: update state, then run a full evaluation pass
    ///
    /// Returns the transitions confirmed during this pass; the same records
    /// are appended to the controller's transition log.
    pub fn handle_event(&mut self, event: ClimateEvent) -> Vec<TransitionRecord> {
        let now = event.now();
        match event {
            ClimateEvent::TemperatureChanged { value, .. } => {
                self.environment.update_temperature(value);
            }
            ClimateEvent::FloorTemperatureChanged { value, .. } => {
                self.overrides.update_floor_temperature(value);
            }
            ClimateEvent::HumidityChanged { value, .. } => {
                self.environment.update_humidity(value);
            }
            ClimateEvent::OpeningStateChanged {
                ref opening_id,
                is_open,
                ..
            } => {
                self.overrides.set_opening(opening_id, is_open, now);
            }
            ClimateEvent::HvacModeChanged { mode, .. } => {
                self.environment.set_hvac_mode(mode);
            }
            ClimateEvent::TargetChanged { target, .. } => {
                self.environment.update_target(target);
            }
            ClimateEvent::Tick { .. } => {}
        }
        self.evaluate(now)
    }

    /// All transitions confirmed since construction
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.log
    }

    pub fn hvac_mode(&self) -> HvacMode {
        self.environment.hvac_mode()
    }

    /// Confirmed state of a fitted channel
    pub fn is_active(&self, channel: Channel) -> Option<bool> {
        self.output(channel).map(DeviceOutput::is_active)
    }

    /// Whether a fitted channel is in a persistent driver fault
    pub fn is_faulted(&self, channel: Channel) -> Option<bool> {
        self.output(channel).map(DeviceOutput::is_faulted)
    }

    /// Stage sequencer state, when an auxiliary stage is fitted
    pub fn stage_state(&self) -> Option<StageState> {
        self.sequencer.as_ref().map(StageSequencer::state)
    }

    /// Clear a persistent driver fault so the channel is commanded again
    pub fn clear_fault(&mut self, channel: Channel) {
        if let Some(output) = self.outputs.iter_mut().find(|o| o.channel() == channel) {
            output.clear_fault();
        }
    }

    fn output(&self, channel: Channel) -> Option<&DeviceOutput> {
        self.outputs.iter().find(|o| o.channel() == channel)
    }

    fn evaluate(&mut self, now: DateTime<Utc>) -> Vec<TransitionRecord> {
        let mode = self.environment.hvac_mode();
        let overrides = self.overrides.derive(&self.config, mode, now);
        let verdicts = Verdicts {
            too_cold: self.environment.is_too_cold(),
            too_hot: self.environment.is_too_hot(),
            heating_satisfied: self.environment.is_heating_satisfied(),
            cooling_satisfied: self.environment.is_cooling_satisfied(),
            too_moist: self.environment.is_too_moist(),
            dry_enough: self.environment.is_dry_enough(),
        };

        // Decide everything from the pre-pass snapshot, then issue in
        // ISSUE_ORDER so forced deactivations take the auxiliary down with
        // (and before) its primary.
        let decisions: Vec<Option<Decision>> = self
            .outputs
            .iter()
            .map(|output| {
                self.decide(output.channel(), output.is_active(), mode, &overrides, verdicts, now)
            })
            .collect();

        let mut records = Vec::new();
        for (output, decision) in self.outputs.iter_mut().zip(decisions) {
            match output.apply(decision, now) {
                CommandAction::Issue { active } => {
                    match self.driver.set_output(output.channel(), active) {
                        Ok(()) => {
                            if let Some(record) = output.confirm(now) {
                                records.push(record);
                            }
                        }
                        Err(err) => {
                            warn!(
                                channel = %output.channel(),
                                error = %err,
                                "driver command failed, will retry"
                            );
                            output.command_failed();
                        }
                    }
                }
                CommandAction::Deferred | CommandAction::None => {}
            }
        }

        if let Some(sequencer) = &mut self.sequencer {
            let primary = self
                .outputs
                .iter()
                .find(|o| o.channel() == Channel::Heater)
                .is_some_and(DeviceOutput::is_active);
            let aux = self
                .outputs
                .iter()
                .find(|o| o.channel() == Channel::AuxHeater)
                .is_some_and(DeviceOutput::is_active);
            sequencer.observe(primary, aux, now);
        }

        self.log.extend(records.iter().cloned());
        records
    }

    /// Decision for one channel
    ///
    /// Precedence: mode participation, then opening pause, then floor
    /// clamp, then room hysteresis. Forced decisions bypass the
    /// minimum-cycle debounce. `None` means hold the current state.
    fn decide(
        &self,
        channel: Channel,
        active: bool,
        mode: HvacMode,
        overrides: &OverrideState,
        verdicts: Verdicts,
        now: DateTime<Utc>,
    ) -> Option<Decision> {
        if !channel.serves_mode(mode) {
            return Some(Decision::forced(false, ReasonCode::Normal));
        }
        if overrides.openings_paused {
            return Some(Decision::forced(false, ReasonCode::PausedByOpening));
        }
        if channel.is_heat_type() {
            match overrides.floor_clamp {
                Some(FloorClamp::ForceOff) => {
                    return Some(Decision::forced(false, ReasonCode::ForcedByFloorLimit));
                }
                // The protective force-on drives the primary only; the
                // auxiliary still follows the stage sequencer.
                Some(FloorClamp::ForceOn) if channel == Channel::Heater => {
                    return Some(Decision::forced(true, ReasonCode::ForcedByFloorLimit));
                }
                _ => {}
            }
        }

        match channel {
            Channel::Heater => {
                hysteresis(active, verdicts.too_cold, verdicts.heating_satisfied)
            }
            Channel::Cooler | Channel::Fan => {
                hysteresis(active, verdicts.too_hot, verdicts.cooling_satisfied)
            }
            Channel::Dehumidifier => {
                hysteresis(active, verdicts.too_moist, verdicts.dry_enough)
            }
            Channel::AuxHeater => {
                if active {
                    // Escalated: mirror the primary's hysteresis until satisfied
                    verdicts.heating_satisfied.then(|| Decision::normal(false))
                } else {
                    self.sequencer
                        .as_ref()
                        .is_some_and(|s| s.should_escalate(verdicts.too_cold, now))
                        .then(|| Decision::normal(true))
                }
            }
        }
    }
}

/// Plain two-verdict hysteresis: energize on demand, release when satisfied
fn hysteresis(active: bool, demand: bool, satisfied: bool) -> Option<Decision> {
    if !active && demand {
        Some(Decision::normal(true))
    } else if active && satisfied {
        Some(Decision::normal(false))
    } else {
        None
    }
}
