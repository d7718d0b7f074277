//! biofeedback.reading.v1 schema
//!
//! This module defines the device-facing input schema: one JSON object per
//! sensor tick, delivered individually, as an array, or as NDJSON.

mod adapter;
mod raw_reading;

pub use adapter::*;
pub use raw_reading::*;
