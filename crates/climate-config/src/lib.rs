//! Validated configuration for the climate-control engine
//!
//! The upstream configuration wizard produces these structures already
//! validated; this crate carries the types plus the defensive range
//! re-checks the engine runs before it starts.

mod controller_config;
mod error;

pub use controller_config::{
    ControllerConfig, FloorConfig, HumidityConfig, OpeningConfig, StageConfig, ToleranceConfig,
    MODE_TOLERANCE_MAX, MODE_TOLERANCE_MIN,
};
pub use error::{ConfigError, ConfigResult};
