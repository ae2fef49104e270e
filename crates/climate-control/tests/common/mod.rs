//! Shared helpers for controller scenario tests

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod driver;
pub mod time;

use std::collections::HashMap;

use climate_config::{ControllerConfig, FloorConfig, ToleranceConfig};
use climate_core::Channel;

/// Route engine logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A controller config with sane tolerances and nothing else configured
pub fn base_config(channels: Vec<Channel>) -> ControllerConfig {
    ControllerConfig {
        channels,
        tolerances: ToleranceConfig {
            cold_tolerance: 0.5,
            hot_tolerance: 0.5,
            heat_tolerance: None,
            cool_tolerance: None,
        },
        humidity: None,
        min_cycle_duration_secs: None,
        min_cycle_overrides_secs: HashMap::new(),
        floor: FloorConfig::default(),
        openings: Vec::new(),
        stage: None,
    }
}
