//! Inbound events consumed by the decision engine
//!
//! Every event carries the timestamp at which it was observed. The engine
//! never reads the wall clock itself, so replaying the same event sequence
//! from a fresh controller produces identical transition logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HvacMode;

/// A target temperature update: a single setpoint or a heat/cool range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetTemp {
    Single(f64),
    Range { low: f64, high: f64 },
}

/// One event delivered to the engine
///
/// Sensor variants carry `Option<f64>`: `None` models the sensor going
/// unavailable, which makes the engine fail safe (no action) rather than
/// act on stale data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClimateEvent {
    TemperatureChanged {
        value: Option<f64>,
        now: DateTime<Utc>,
    },
    FloorTemperatureChanged {
        value: Option<f64>,
        now: DateTime<Utc>,
    },
    HumidityChanged {
        value: Option<f64>,
        now: DateTime<Utc>,
    },
    OpeningStateChanged {
        opening_id: String,
        is_open: bool,
        now: DateTime<Utc>,
    },
    HvacModeChanged {
        mode: HvacMode,
        now: DateTime<Utc>,
    },
    TargetChanged {
        target: TargetTemp,
        now: DateTime<Utc>,
    },
    /// Periodic keep-alive: re-runs the full evaluation with no state change
    Tick { now: DateTime<Utc> },
}

impl ClimateEvent {
    /// The timestamp carried by this event
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            ClimateEvent::TemperatureChanged { now, .. }
            | ClimateEvent::FloorTemperatureChanged { now, .. }
            | ClimateEvent::HumidityChanged { now, .. }
            | ClimateEvent::OpeningStateChanged { now, .. }
            | ClimateEvent::HvacModeChanged { now, .. }
            | ClimateEvent::TargetChanged { now, .. }
            | ClimateEvent::Tick { now } => *now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_timestamp() {
        let now = Utc::now();
        let event = ClimateEvent::TemperatureChanged {
            value: Some(21.5),
            now,
        };
        assert_eq!(event.now(), now);
    }

    #[test]
    fn test_target_range_deserializes_untagged() {
        let target: TargetTemp = serde_json::from_str(r#"{"low": 19.0, "high": 24.0}"#).unwrap();
        assert_eq!(
            target,
            TargetTemp::Range {
                low: 19.0,
                high: 24.0
            }
        );

        let target: TargetTemp = serde_json::from_str("21.0").unwrap();
        assert_eq!(target, TargetTemp::Single(21.0));
    }
}
