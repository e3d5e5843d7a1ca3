//! Per-consumer bundles of metric handles.
//!
//! A reconciler or work queue binds its handles once at setup, by name,
//! and keeps the bundle for its lifetime.

use std::time::Duration;

use tracing::debug;

use crate::interfaces::{
    ControllerMetricsProvider, CounterMetric, GaugeMetric, HistogramMetric, LabeledCounterMetric,
    Result, SettableGaugeMetric, WorkqueueMetricsProvider,
};
use crate::options::ControllerOptions;

/// How a single reconcile ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Success,
    Error,
    Requeue,
    RequeueAfter,
    Panic,
}

impl ReconcileOutcome {
    /// Value of the `result` label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Success => "success",
            ReconcileOutcome::Error => "error",
            ReconcileOutcome::Requeue => "requeue",
            ReconcileOutcome::RequeueAfter => "requeue_after",
            ReconcileOutcome::Panic => "panic",
        }
    }
}

/// Every controller handle for one controller name.
pub struct ControllerInstruments {
    pub active_workers: Box<dyn GaugeMetric>,
    pub reconcile_total: Box<dyn LabeledCounterMetric>,
    pub reconcile_time: Box<dyn HistogramMetric>,
    pub worker_count: Box<dyn SettableGaugeMetric>,
    pub reconcile_panics: Box<dyn CounterMetric>,
    pub reconcile_errors: Box<dyn CounterMetric>,
}

impl ControllerInstruments {
    /// Bind handles for `name` and publish the configured worker count.
    pub fn new(
        provider: &dyn ControllerMetricsProvider,
        name: &str,
        options: &ControllerOptions,
    ) -> Result<Self> {
        options.validate()?;

        let instruments = Self {
            active_workers: provider.new_active_workers_metric(name),
            reconcile_total: provider.new_reconcile_total_metric(name),
            reconcile_time: provider.new_reconcile_time_metric(name),
            worker_count: provider.new_worker_count_metric(name),
            reconcile_panics: provider.new_reconcile_panics_metric(name),
            reconcile_errors: provider.new_reconcile_errors_metric(name),
        };
        instruments
            .worker_count
            .set(options.concurrent_workers() as f64);

        debug!(
            controller = name,
            workers = options.concurrent_workers(),
            "Controller instruments bound"
        );
        Ok(instruments)
    }

    /// Count one busy worker until the guard drops.
    pub fn active_worker(&self) -> ActiveWorkerGuard<'_> {
        self.active_workers.inc();
        ActiveWorkerGuard {
            gauge: self.active_workers.as_ref(),
        }
    }

    /// Record a finished reconcile.
    ///
    /// Errors also bump the error counter, panics the panic counter.
    pub fn record_reconcile(&self, outcome: ReconcileOutcome, elapsed: Duration) {
        self.reconcile_total.inc_labeled(outcome.as_str());
        self.reconcile_time.observe(elapsed.as_secs_f64());
        match outcome {
            ReconcileOutcome::Error => self.reconcile_errors.inc(),
            ReconcileOutcome::Panic => self.reconcile_panics.inc(),
            _ => {}
        }
    }
}

/// Decrements the active worker gauge on drop.
pub struct ActiveWorkerGuard<'a> {
    gauge: &'a dyn GaugeMetric,
}

impl Drop for ActiveWorkerGuard<'_> {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Every work queue handle for one queue name.
pub struct WorkqueueInstruments {
    pub depth: Box<dyn GaugeMetric>,
    pub adds: Box<dyn CounterMetric>,
    pub latency: Box<dyn HistogramMetric>,
    pub work_duration: Box<dyn HistogramMetric>,
    pub unfinished_work_seconds: Box<dyn SettableGaugeMetric>,
    pub longest_running_processor_seconds: Box<dyn SettableGaugeMetric>,
    pub retries: Box<dyn CounterMetric>,
}

impl WorkqueueInstruments {
    pub fn new(provider: &dyn WorkqueueMetricsProvider, name: &str) -> Self {
        debug!(queue = name, "Workqueue instruments bound");
        Self {
            depth: provider.new_depth_metric(name),
            adds: provider.new_adds_metric(name),
            latency: provider.new_latency_metric(name),
            work_duration: provider.new_work_duration_metric(name),
            unfinished_work_seconds: provider.new_unfinished_work_seconds_metric(name),
            longest_running_processor_seconds: provider
                .new_longest_running_processor_seconds_metric(name),
            retries: provider.new_retries_metric(name),
        }
    }

    /// An item entered the queue.
    pub fn added(&self) {
        self.adds.inc();
        self.depth.inc();
    }

    /// An item left the queue after waiting `waited`.
    pub fn taken(&self, waited: Duration) {
        self.depth.dec();
        self.latency.observe(waited.as_secs_f64());
    }

    /// Processing of an item finished after `took`.
    pub fn done(&self, took: Duration) {
        self.work_duration.observe(took.as_secs_f64());
    }

    /// Publish in-flight work figures, usually from a periodic ticker.
    pub fn update_unfinished_work(&self, unfinished: Duration, longest: Duration) {
        self.unfinished_work_seconds.set(unfinished.as_secs_f64());
        self.longest_running_processor_seconds
            .set(longest.as_secs_f64());
    }
}
