//! OpenTelemetry controller metrics provider.

use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter, UpDownCounter};
use tracing::info;

use super::attributes::LabelSchema;
use super::counter::{OtelCounter, OtelLabeledCounter};
use super::delta_gauge::DeltaGaugeFamily;
use super::histogram::OtelHistogram;
use super::latest_value::{LatestValueStore, ObservedGauge};
use crate::config::ControllerMetricsConfig;
use crate::interfaces::{
    ControllerMetricsProvider, CounterMetric, GaugeMetric, HistogramMetric, LabeledCounterMetric,
    Result, SettableGaugeMetric,
};

/// Meter used when no meter is supplied.
pub const CONTROLLER_METER_NAME: &str = "controlloop";

/// Controller metrics backed by OpenTelemetry instruments.
///
/// Every instrument is created once, in [`OtelControllerMetrics::new`].
/// Series are labeled `controller=<name>`.
pub struct OtelControllerMetrics {
    reconcile_total: Counter<u64>,
    reconcile_errors: Counter<u64>,
    reconcile_panics: Counter<u64>,
    reconcile_time: Histogram<f64>,
    active_workers: DeltaGaugeFamily<i64, UpDownCounter<i64>>,
    worker_count: ObservedGauge,
}

impl OtelControllerMetrics {
    /// Build all controller instruments on `meter`.
    ///
    /// Fails if any configured name or bucket set is invalid; nothing is
    /// registered in that case.
    pub fn new(meter: &Meter, config: &ControllerMetricsConfig) -> Result<Self> {
        config.validate()?;

        let reconcile_total = meter
            .u64_counter(config.reconcile_total.clone())
            .with_description("Total number of reconciliations per controller")
            .build();

        let reconcile_errors = meter
            .u64_counter(config.reconcile_errors.clone())
            .with_description("Total number of reconciliation errors per controller")
            .build();

        let reconcile_panics = meter
            .u64_counter(config.reconcile_panics.clone())
            .with_description("Total number of reconciliation panics per controller")
            .build();

        let reconcile_time = meter
            .f64_histogram(config.reconcile_time.clone())
            .with_description("Length of time per reconciliation per controller")
            .with_unit("s")
            .with_boundaries(config.reconcile_time_buckets.clone())
            .build();

        let active_workers = meter
            .i64_up_down_counter(config.active_workers.clone())
            .with_description("Number of currently used workers per controller")
            .build();

        let worker_count = ObservedGauge::register(
            meter,
            config.max_concurrent_reconciles.clone(),
            "Maximum number of concurrent reconciles per controller",
            None,
            LabelSchema::CONTROLLER,
        );

        info!(
            reconcile_time = %config.reconcile_time,
            buckets = config.reconcile_time_buckets.len(),
            "Controller metrics registered"
        );

        Ok(Self {
            reconcile_total,
            reconcile_errors,
            reconcile_panics,
            reconcile_time,
            active_workers: DeltaGaugeFamily::new(active_workers, LabelSchema::CONTROLLER),
            worker_count,
        })
    }

    /// Build on the global meter provider's `controlloop` meter.
    pub fn from_global(config: &ControllerMetricsConfig) -> Result<Self> {
        Self::new(&global::meter(CONTROLLER_METER_NAME), config)
    }

    /// Worker counts awaiting the next collection.
    pub fn worker_counts(&self) -> &LatestValueStore {
        self.worker_count.store()
    }
}

impl ControllerMetricsProvider for OtelControllerMetrics {
    fn new_active_workers_metric(&self, name: &str) -> Box<dyn GaugeMetric> {
        Box::new(self.active_workers.handle(name))
    }

    fn new_reconcile_total_metric(&self, name: &str) -> Box<dyn LabeledCounterMetric> {
        Box::new(OtelLabeledCounter::new(
            self.reconcile_total.clone(),
            LabelSchema::CONTROLLER.attributes(name),
        ))
    }

    fn new_reconcile_time_metric(&self, name: &str) -> Box<dyn HistogramMetric> {
        Box::new(OtelHistogram::new(
            self.reconcile_time.clone(),
            LabelSchema::CONTROLLER.attributes(name),
        ))
    }

    fn new_worker_count_metric(&self, name: &str) -> Box<dyn SettableGaugeMetric> {
        Box::new(self.worker_count.handle(name))
    }

    fn new_reconcile_panics_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(OtelCounter::new(
            self.reconcile_panics.clone(),
            LabelSchema::CONTROLLER.attributes(name),
        ))
    }

    fn new_reconcile_errors_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(OtelCounter::new(
            self.reconcile_errors.clone(),
            LabelSchema::CONTROLLER.attributes(name),
        ))
    }
}
