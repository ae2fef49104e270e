//! Controllable time source for scenario tests
//!
//! Events carry their own timestamps, so a scenario advances time by
//! stamping successive events from this clock; the engine never reads the
//! wall clock during evaluation.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};

pub struct TestClock {
    current: Cell<DateTime<Utc>>,
}

impl TestClock {
    /// Start at a fixed instant so failures print stable timestamps
    pub fn new() -> Self {
        Self {
            current: Cell::new(Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }

    pub fn advance(&self, duration: Duration) {
        self.current.set(self.current.get() + duration);
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}
