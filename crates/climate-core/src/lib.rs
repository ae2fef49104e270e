//! Core types for the climate-control decision engine
//!
//! This crate provides the fundamental types shared by the configuration
//! layer and the control engine: HvacMode, equipment Channel kinds, the
//! inbound ClimateEvent stream, and the structured transition records
//! emitted for observability.

mod event;
mod hvac;
mod transition;

pub use event::{ClimateEvent, TargetTemp};
pub use hvac::{Channel, HvacMode};
pub use transition::{ReasonCode, TransitionRecord};
