//! Error types for configuration validation

use climate_core::Channel;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the defensive configuration re-checks
///
/// Configuration is validated upstream by the wizard; any of these reaching
/// the engine is fatal at startup, the controller refuses to initialize.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A value is outside its permitted range
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// No equipment channels configured
    #[error("no equipment channels configured")]
    NoChannels,

    /// The same channel listed twice
    #[error("channel '{channel}' configured more than once")]
    DuplicateChannel { channel: Channel },

    /// Two openings share an id
    #[error("duplicate opening id '{id}'")]
    DuplicateOpening { id: String },

    /// Auxiliary stage fitted without escalation settings
    #[error("aux_heater channel requires stage escalation settings")]
    AuxWithoutStage,

    /// Escalation settings present without an auxiliary stage
    #[error("stage escalation settings require the aux_heater channel")]
    StageWithoutAux,

    /// Auxiliary stage fitted without a primary heater
    #[error("aux_heater channel requires a heater channel as its primary")]
    AuxWithoutHeater,
}
