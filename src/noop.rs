//! No-op metrics provider.
//!
//! Handed out when metrics are disabled. Every handle discards what it is
//! given.

use crate::interfaces::{
    ControllerMetricsProvider, CounterMetric, GaugeMetric, HistogramMetric, LabeledCounterMetric,
    SettableGaugeMetric, WorkqueueMetricsProvider,
};

/// Provider whose handles record nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsProvider;

/// Handle implementing every metric contract as a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetric;

impl CounterMetric for NoopMetric {
    fn inc(&self) {}
}

impl LabeledCounterMetric for NoopMetric {
    fn inc_labeled(&self, _result: &str) {}
}

impl HistogramMetric for NoopMetric {
    fn observe(&self, _value: f64) {}
}

impl SettableGaugeMetric for NoopMetric {
    fn set(&self, _value: f64) {}
}

impl GaugeMetric for NoopMetric {
    fn add(&self, _n: i64) {}
}

impl ControllerMetricsProvider for NoopMetricsProvider {
    fn new_active_workers_metric(&self, _name: &str) -> Box<dyn GaugeMetric> {
        Box::new(NoopMetric)
    }

    fn new_reconcile_total_metric(&self, _name: &str) -> Box<dyn LabeledCounterMetric> {
        Box::new(NoopMetric)
    }

    fn new_reconcile_time_metric(&self, _name: &str) -> Box<dyn HistogramMetric> {
        Box::new(NoopMetric)
    }

    fn new_worker_count_metric(&self, _name: &str) -> Box<dyn SettableGaugeMetric> {
        Box::new(NoopMetric)
    }

    fn new_reconcile_panics_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(NoopMetric)
    }

    fn new_reconcile_errors_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(NoopMetric)
    }
}

impl WorkqueueMetricsProvider for NoopMetricsProvider {
    fn new_depth_metric(&self, _name: &str) -> Box<dyn GaugeMetric> {
        Box::new(NoopMetric)
    }

    fn new_adds_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(NoopMetric)
    }

    fn new_latency_metric(&self, _name: &str) -> Box<dyn HistogramMetric> {
        Box::new(NoopMetric)
    }

    fn new_work_duration_metric(&self, _name: &str) -> Box<dyn HistogramMetric> {
        Box::new(NoopMetric)
    }

    fn new_unfinished_work_seconds_metric(&self, _name: &str) -> Box<dyn SettableGaugeMetric> {
        Box::new(NoopMetric)
    }

    fn new_longest_running_processor_seconds_metric(
        &self,
        _name: &str,
    ) -> Box<dyn SettableGaugeMetric> {
        Box::new(NoopMetric)
    }

    fn new_retries_metric(&self, _name: &str) -> Box<dyn CounterMetric> {
        Box::new(NoopMetric)
    }
}
