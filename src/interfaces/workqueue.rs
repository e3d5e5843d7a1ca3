//! Work queue metrics provider interface.

use super::metric::{CounterMetric, GaugeMetric, HistogramMetric, SettableGaugeMetric};

/// Factory for the metrics a work queue records.
///
/// `name` identifies the queue.
///
/// Implementations:
/// - `OtelWorkqueueMetrics`: OpenTelemetry instruments
/// - `NoopMetricsProvider`: discards everything
pub trait WorkqueueMetricsProvider: Send + Sync {
    /// Items currently waiting in the queue.
    fn new_depth_metric(&self, name: &str) -> Box<dyn GaugeMetric>;

    /// Items added to the queue.
    fn new_adds_metric(&self, name: &str) -> Box<dyn CounterMetric>;

    /// Time an item spends queued before processing starts.
    fn new_latency_metric(&self, name: &str) -> Box<dyn HistogramMetric>;

    /// Time spent processing an item.
    fn new_work_duration_metric(&self, name: &str) -> Box<dyn HistogramMetric>;

    /// Seconds of work in progress that has not yet been observed by the
    /// work duration histogram.
    fn new_unfinished_work_seconds_metric(&self, name: &str) -> Box<dyn SettableGaugeMetric>;

    /// Seconds the longest running processor has been running.
    fn new_longest_running_processor_seconds_metric(
        &self,
        name: &str,
    ) -> Box<dyn SettableGaugeMetric>;

    /// Items re-added after a failure.
    fn new_retries_metric(&self, name: &str) -> Box<dyn CounterMetric>;
}
