//! Mindpulse - On-device wellness scoring from biofeedback sensor readings
//!
//! Mindpulse turns one reading from a wrist-worn biofeedback device (heart
//! rate, skin temperature, SpO2, galvanic skin response) into five wellness
//! scores on a 1–10 scale, risk and capacity labels, insights and
//! recommendations. The pipeline is deterministic:
//! schema parsing → normalization → scoring → classification → insights
//! → snapshot encoding.
//!
//! ## Modules
//!
//! - **Scoring**: pure, stateless `score` over a single reading
//! - **Monitor**: ring buffer of recent readings with freshness-aware snapshots

pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod freshness;
pub mod history;
pub mod insights;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod scorer;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::MonitorConfig;
pub use error::ComputeError;
pub use freshness::{Freshness, FreshnessWindows};
pub use history::{HistorySummary, ReadingHistory};
pub use pipeline::{score_reading_json, WellnessMonitor};
pub use scorer::score;
pub use types::{SensorReading, WellnessScore, WellnessSnapshot};

// Schema exports
pub use schema::{RawReading, ReadingAdapter, SCHEMA_VERSION};

/// Mindpulse version embedded in all snapshots
pub const MINDPULSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for snapshots
pub const PRODUCER_NAME: &str = "mindpulse";
