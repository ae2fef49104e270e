//! Climate-control decision engine
//!
//! Decides, on every sensor update, whether heating/cooling/fan/dehumidify
//! equipment should be energized, while protecting the equipment from
//! short cycling and respecting safety overrides (opening sensors and
//! floor-temperature clamps).
//!
//! The core is a synchronous evaluation pass per event: the environment
//! tracker updates, the tolerance selector picks the active hysteresis
//! band, each output's activation state machine evaluates its transition,
//! the safety override layer vetoes or permits it, and the stage sequencer
//! escalates to the auxiliary output when the primary cannot keep up.
//! [`ClimateService`] wraps a controller in a tokio task for async hosts.

mod activation;
mod controller;
mod driver;
mod environment;
mod overrides;
mod sequencer;
mod service;
pub mod tolerance;

pub use activation::{CommandAction, Decision, DeviceOutput};
pub use controller::ClimateController;
pub use driver::{DriverError, OutputDriver, MAX_DRIVER_RETRIES};
pub use environment::EnvironmentTracker;
pub use overrides::{FloorClamp, OverrideState, SafetyOverrides};
pub use sequencer::{StageSequencer, StageState};
pub use service::ClimateService;
