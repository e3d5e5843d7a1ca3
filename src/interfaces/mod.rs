//! Abstract interfaces for metrics consumers.
//!
//! These traits define the contracts for:
//! - Metric handles (counter, labeled counter, histogram, gauges)
//! - Controller metrics providers (reconcile loop instrumentation)
//! - Work queue metrics providers (queue instrumentation)
//!
//! Reconcilers and work queues only ever see these traits, so any
//! implementation can be substituted (OpenTelemetry, no-op, test doubles).

pub mod controller;
pub mod metric;
pub mod workqueue;

pub use controller::ControllerMetricsProvider;
pub use metric::{
    CounterMetric, GaugeMetric, HistogramMetric, LabeledCounterMetric, SettableGaugeMetric,
};
pub use workqueue::WorkqueueMetricsProvider;

/// Result type for provider construction.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors raised while building metrics providers.
///
/// Recording never fails; every variant here is a startup-time
/// misconfiguration that should abort the process.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Invalid instrument name '{name}': {reason}")]
    InvalidInstrumentName { name: String, reason: String },

    #[error("Instrument name '{0}' is used more than once")]
    DuplicateInstrumentName(String),

    #[error("Invalid bucket boundaries for '{instrument}': {reason}")]
    InvalidBuckets { instrument: String, reason: String },

    #[error("Invalid controller options: {0}")]
    InvalidControllerOptions(String),

    #[error("Metric exporter setup failed: {0}")]
    Exporter(String),
}
