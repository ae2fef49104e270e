//! Structured transition records emitted for observability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Channel;

/// Why a transition (or veto) happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Ordinary hysteresis decision
    Normal,
    /// An open door/window forced the output off
    PausedByOpening,
    /// The floor-temperature clamp forced the output state
    ForcedByFloorLimit,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Normal => "normal",
            ReasonCode::PausedByOpening => "paused_by_opening",
            ReasonCode::ForcedByFloorLimit => "forced_by_floor_limit",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One confirmed output transition
///
/// Appended to the controller's transition log and mirrored to tracing so
/// calling code can surface the reason alongside the state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub channel: Channel,
    pub from_active: bool,
    pub to_active: bool,
    pub reason: ReasonCode,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_reason_code() {
        let record = TransitionRecord {
            channel: Channel::AuxHeater,
            from_active: false,
            to_active: true,
            reason: ReasonCode::Normal,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["channel"], "aux_heater");
        assert_eq!(json["reason"], "normal");
        assert_eq!(json["to_active"], true);
    }

    #[test]
    fn test_reason_code_strings() {
        assert_eq!(ReasonCode::PausedByOpening.as_str(), "paused_by_opening");
        assert_eq!(
            ReasonCode::ForcedByFloorLimit.to_string(),
            "forced_by_floor_limit"
        );
    }
}
