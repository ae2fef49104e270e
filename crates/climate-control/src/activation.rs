//! Per-channel activation state machine
//!
//! Each equipment output is an OFF/ON machine. Ordinary transitions are
//! debounced by the channel's minimum cycle duration; override-forced
//! transitions bypass the debounce (safety takes precedence over
//! anti-short-cycling). Bookkeeping only flips once the driver confirms
//! the command, so a failed command is re-issued on later ticks.

use chrono::{DateTime, Duration, Utc};
use climate_core::{Channel, ReasonCode, TransitionRecord};
use tracing::{debug, error, info};

use crate::driver::MAX_DRIVER_RETRIES;

/// The decision the evaluation pass reached for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the channel should be energized
    pub active: bool,
    /// Why, surfaced with the resulting transition
    pub reason: ReasonCode,
    /// Forced decisions bypass the minimum-cycle debounce
    pub forced: bool,
}

impl Decision {
    pub fn normal(active: bool) -> Self {
        Self {
            active,
            reason: ReasonCode::Normal,
            forced: false,
        }
    }

    pub fn forced(active: bool, reason: ReasonCode) -> Self {
        Self {
            active,
            reason,
            forced: true,
        }
    }
}

/// What the controller should do at the driver seam for this channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Issue a driver command for the given state
    Issue { active: bool },
    /// A required transition is blocked by the debounce; re-evaluated next tick
    Deferred,
    /// Nothing to do
    None,
}

/// One controlled equipment output
#[derive(Debug)]
pub struct DeviceOutput {
    channel: Channel,
    is_active: bool,
    last_transition_at: Option<DateTime<Utc>>,
    min_cycle_duration: Option<Duration>,

    // Command awaiting driver confirmation, with the reason that produced it
    pending: Option<(bool, ReasonCode)>,
    retries: u32,
    faulted: bool,
}

impl DeviceOutput {
    pub fn new(channel: Channel, min_cycle_duration: Option<Duration>) -> Self {
        Self {
            channel,
            is_active: false,
            last_transition_at: None,
            min_cycle_duration,
            pending: None,
            retries: 0,
            faulted: false,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Confirmed physical state
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    fn can_transition(&self, now: DateTime<Utc>) -> bool {
        match (self.last_transition_at, self.min_cycle_duration) {
            (Some(last), Some(min_cycle)) => now.signed_duration_since(last) >= min_cycle,
            _ => true,
        }
    }

    /// Apply this evaluation's decision (or lack of one)
    ///
    /// With no new decision, an unconfirmed command from an earlier pass is
    /// re-issued, unless the channel has already been marked faulted.
    pub fn apply(&mut self, decision: Option<Decision>, now: DateTime<Utc>) -> CommandAction {
        match decision {
            Some(decision) => {
                if decision.active == self.is_active {
                    // Already satisfied; drop any stale unconfirmed command
                    if self.pending.take().is_some() {
                        self.retries = 0;
                    }
                    CommandAction::None
                } else if self.faulted && !decision.forced {
                    // Persistent fault: stop commanding the device until an
                    // override forces it or the fault is cleared
                    CommandAction::None
                } else if !decision.forced && !self.can_transition(now) {
                    debug!(
                        channel = %self.channel,
                        desired = decision.active,
                        "transition deferred by minimum cycle duration"
                    );
                    CommandAction::Deferred
                } else {
                    self.pending = Some((decision.active, decision.reason));
                    CommandAction::Issue {
                        active: decision.active,
                    }
                }
            }
            None => match self.pending {
                Some((active, _)) if !self.faulted => CommandAction::Issue { active },
                _ => CommandAction::None,
            },
        }
    }

    /// The driver confirmed the pending command
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Option<TransitionRecord> {
        let (active, reason) = self.pending.take()?;
        let record = TransitionRecord {
            channel: self.channel,
            from_active: self.is_active,
            to_active: active,
            reason,
            timestamp: now,
        };
        self.is_active = active;
        self.last_transition_at = Some(now);
        self.retries = 0;
        if self.faulted {
            info!(channel = %self.channel, "channel recovered from driver fault");
            self.faulted = false;
        }
        info!(
            channel = %self.channel,
            from = record.from_active,
            to = record.to_active,
            reason = %record.reason,
            "output transition"
        );
        Some(record)
    }

    /// Clear a persistent driver fault so ordinary decisions command again
    pub fn clear_fault(&mut self) {
        if self.faulted {
            info!(channel = %self.channel, "driver fault cleared");
            self.faulted = false;
            self.retries = 0;
        }
    }

    /// The driver rejected the pending command; keep it for a later retry
    pub fn command_failed(&mut self) {
        self.retries += 1;
        if self.retries >= MAX_DRIVER_RETRIES && !self.faulted {
            self.faulted = true;
            error!(
                channel = %self.channel,
                retries = self.retries,
                "driver command failed repeatedly, marking channel faulted"
            );
        }
    }
}
