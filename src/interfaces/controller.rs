//! Controller metrics provider interface.

use super::metric::{
    CounterMetric, GaugeMetric, HistogramMetric, LabeledCounterMetric, SettableGaugeMetric,
};

/// Factory for the metrics a reconcile loop records.
///
/// `name` identifies the controller; every handle built for the same
/// name feeds the same series.
///
/// Implementations:
/// - `OtelControllerMetrics`: OpenTelemetry instruments
/// - `NoopMetricsProvider`: discards everything
pub trait ControllerMetricsProvider: Send + Sync {
    /// Number of workers currently reconciling.
    fn new_active_workers_metric(&self, name: &str) -> Box<dyn GaugeMetric>;

    /// Reconcile attempts, labeled by outcome.
    fn new_reconcile_total_metric(&self, name: &str) -> Box<dyn LabeledCounterMetric>;

    /// Duration of a single reconcile, in seconds.
    fn new_reconcile_time_metric(&self, name: &str) -> Box<dyn HistogramMetric>;

    /// Configured maximum of concurrent reconciles.
    fn new_worker_count_metric(&self, name: &str) -> Box<dyn SettableGaugeMetric>;

    /// Reconciles that panicked.
    fn new_reconcile_panics_metric(&self, name: &str) -> Box<dyn CounterMetric>;

    /// Reconciles that returned an error.
    fn new_reconcile_errors_metric(&self, name: &str) -> Box<dyn CounterMetric>;
}
