//! Device driver seam
//!
//! The engine decides; the driver energizes. How a channel is physically
//! realized (switch entity, relay, IR blaster) is the host's concern
//! behind this trait. Calls are treated as fire-and-forget commands that
//! either confirm synchronously or fail and get retried on later ticks.

use climate_core::Channel;
use thiserror::Error;

/// How many failed commands before a channel is surfaced as faulted
pub const MAX_DRIVER_RETRIES: u32 = 5;

/// Errors returned by a device driver
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The device rejected the command
    #[error("channel '{channel}' rejected command: {reason}")]
    CommandRejected { channel: Channel, reason: String },

    /// The device is unreachable
    #[error("channel '{channel}' is unavailable")]
    Unavailable { channel: Channel },
}

/// Physical switch control for equipment channels
pub trait OutputDriver: Send {
    /// Energize or de-energize a channel
    fn set_output(&mut self, channel: Channel, active: bool) -> Result<(), DriverError>;
}
