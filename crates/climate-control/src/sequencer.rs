//! Stage sequencer for dual-stage/auxiliary heating
//!
//! Watches the primary heater and escalates to the auxiliary stage when
//! demand persists past the escalation timeout. Resets whenever the
//! primary deactivates.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Primary off
    Idle,
    /// Primary running, auxiliary not engaged
    PrimaryActive,
    /// Auxiliary engaged alongside the primary
    Escalated,
}

#[derive(Debug)]
pub struct StageSequencer {
    state: StageState,
    primary_activated_at: Option<DateTime<Utc>>,
    escalation_timeout: Duration,
}

impl StageSequencer {
    pub fn new(escalation_timeout: Duration) -> Self {
        Self {
            state: StageState::Idle,
            primary_activated_at: None,
            escalation_timeout,
        }
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Whether the auxiliary should engage: demand has persisted for the
    /// full escalation timeout since the primary came on
    pub fn should_escalate(&self, demand: bool, now: DateTime<Utc>) -> bool {
        if self.state != StageState::PrimaryActive || !demand {
            return false;
        }
        match self.primary_activated_at {
            Some(activated_at) => {
                now.signed_duration_since(activated_at) >= self.escalation_timeout
            }
            None => false,
        }
    }

    /// Observe the confirmed output states after an evaluation pass
    pub fn observe(&mut self, primary_active: bool, aux_active: bool, now: DateTime<Utc>) {
        if !primary_active {
            if self.state != StageState::Idle {
                debug!("primary deactivated, stage sequencer reset");
                self.state = StageState::Idle;
                self.primary_activated_at = None;
            }
            return;
        }

        if self.state == StageState::Idle {
            self.primary_activated_at = Some(now);
        }
        let next = if aux_active {
            StageState::Escalated
        } else {
            StageState::PrimaryActive
        };
        if next == StageState::Escalated && self.state != StageState::Escalated {
            info!("auxiliary stage engaged");
        }
        self.state = next;
    }
}
