//! Recording mock driver
//!
//! Records every command the engine issues and can be switched into a
//! failing state to exercise the retry/fault path. Handles are cloneable
//! so the test keeps a view after the controller takes ownership.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use climate_control::{DriverError, OutputDriver};
use climate_core::Channel;

#[derive(Clone, Default)]
pub struct RecordingDriver {
    commands: Arc<Mutex<Vec<(Channel, bool)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands successfully accepted so far
    pub fn commands(&self) -> Vec<(Channel, bool)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl OutputDriver for RecordingDriver {
    fn set_output(&mut self, channel: Channel, active: bool) -> Result<(), DriverError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DriverError::Unavailable { channel });
        }
        self.commands.lock().unwrap().push((channel, active));
        Ok(())
    }
}
