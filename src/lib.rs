//! controlloop-otel - OpenTelemetry metrics for reconcilers and work queues.
//!
//! Reconcile loops and work queues record through small synchronous
//! handle contracts (`inc`, `inc_labeled`, `observe`, `add`, `set`). This
//! crate implements those contracts on OpenTelemetry, including settable
//! gauges, which OpenTelemetry has no synchronous instrument for:
//!
//! - gauges that also move relatively are tracked as deltas on an
//!   up-down counter ([`otel::DeltaGauge`])
//! - set-only gauges are kept in a latest-value store and reported from
//!   an observable gauge callback ([`otel::LatestValueStore`])
//!
//! ```ignore
//! let config = Config::load()?;
//! let _meter_provider = utils::bootstrap::install_meter_provider(&config.telemetry)?;
//! let providers = MetricsOptions::new().build(&config)?;
//!
//! let metrics = ControllerInstruments::new(
//!     providers.controller.as_ref(),
//!     "orders",
//!     &ControllerOptions::new().with_concurrent_workers(4),
//! )?;
//! metrics.record_reconcile(ReconcileOutcome::Success, elapsed);
//! ```

pub mod config;
pub mod instruments;
pub mod interfaces;
pub mod noop;
pub mod options;
pub mod otel;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod utils;

pub use config::{Config, ConfigError};
pub use instruments::{ControllerInstruments, ReconcileOutcome, WorkqueueInstruments};
pub use interfaces::{ControllerMetricsProvider, MetricsError, WorkqueueMetricsProvider};
pub use noop::NoopMetricsProvider;
pub use options::{ControllerOptions, MetricsOptions, MetricsProviders};
pub use otel::{OtelControllerMetrics, OtelWorkqueueMetrics};
