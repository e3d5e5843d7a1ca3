//! OpenTelemetry work queue metrics provider.

use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter, UpDownCounter};
use tracing::info;

use super::attributes::LabelSchema;
use super::counter::OtelCounter;
use super::delta_gauge::DeltaGaugeFamily;
use super::histogram::OtelHistogram;
use super::latest_value::{LatestValueStore, ObservedGauge};
use crate::config::WorkqueueMetricsConfig;
use crate::interfaces::{
    CounterMetric, GaugeMetric, HistogramMetric, Result, SettableGaugeMetric,
    WorkqueueMetricsProvider,
};

/// Meter used when no meter is supplied.
pub const WORKQUEUE_METER_NAME: &str = "workqueue";

/// Work queue metrics backed by OpenTelemetry instruments.
///
/// Series are labeled `name=<queue name>`. The two seconds gauges are
/// observable and share a store each.
pub struct OtelWorkqueueMetrics {
    adds: Counter<u64>,
    retries: Counter<u64>,
    queue_latency: Histogram<f64>,
    work_duration: Histogram<f64>,
    depth: DeltaGaugeFamily<i64, UpDownCounter<i64>>,
    unfinished_work: ObservedGauge,
    longest_running_processor: ObservedGauge,
}

impl OtelWorkqueueMetrics {
    /// Build all work queue instruments on `meter`.
    pub fn new(meter: &Meter, config: &WorkqueueMetricsConfig) -> Result<Self> {
        config.validate()?;

        let adds = meter
            .u64_counter(config.adds.clone())
            .with_description("Total number of adds handled by workqueue")
            .build();

        let retries = meter
            .u64_counter(config.retries.clone())
            .with_description("Total number of retries handled by workqueue")
            .build();

        let queue_latency = meter
            .f64_histogram(config.queue_latency.clone())
            .with_description("How long an item stays in workqueue before being requested")
            .with_unit("s")
            .with_boundaries(config.latency_buckets.clone())
            .build();

        let work_duration = meter
            .f64_histogram(config.work_duration.clone())
            .with_description("How long processing an item from workqueue takes")
            .with_unit("s")
            .with_boundaries(config.work_duration_buckets.clone())
            .build();

        let depth = meter
            .i64_up_down_counter(config.depth.clone())
            .with_description("Current depth of workqueue")
            .build();

        let unfinished_work = ObservedGauge::register(
            meter,
            config.unfinished_work.clone(),
            "Seconds of work in progress not yet observed by work_duration",
            Some("s"),
            LabelSchema::WORKQUEUE,
        );

        let longest_running_processor = ObservedGauge::register(
            meter,
            config.longest_running_processor.clone(),
            "How many seconds the longest running processor has been running",
            Some("s"),
            LabelSchema::WORKQUEUE,
        );

        info!(
            latency_buckets = config.latency_buckets.len(),
            work_duration_buckets = config.work_duration_buckets.len(),
            "Workqueue metrics registered"
        );

        Ok(Self {
            adds,
            retries,
            queue_latency,
            work_duration,
            depth: DeltaGaugeFamily::new(depth, LabelSchema::WORKQUEUE),
            unfinished_work,
            longest_running_processor,
        })
    }

    /// Build on the global meter provider's `workqueue` meter.
    pub fn from_global(config: &WorkqueueMetricsConfig) -> Result<Self> {
        Self::new(&global::meter(WORKQUEUE_METER_NAME), config)
    }

    pub fn unfinished_work(&self) -> &LatestValueStore {
        self.unfinished_work.store()
    }

    pub fn longest_running_processor(&self) -> &LatestValueStore {
        self.longest_running_processor.store()
    }
}

impl WorkqueueMetricsProvider for OtelWorkqueueMetrics {
    fn new_depth_metric(&self, name: &str) -> Box<dyn GaugeMetric> {
        Box::new(self.depth.handle(name))
    }

    fn new_adds_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(OtelCounter::new(
            self.adds.clone(),
            LabelSchema::WORKQUEUE.attributes(name),
        ))
    }

    fn new_latency_metric(&self, name: &str) -> Box<dyn HistogramMetric> {
        Box::new(OtelHistogram::new(
            self.queue_latency.clone(),
            LabelSchema::WORKQUEUE.attributes(name),
        ))
    }

    fn new_work_duration_metric(&self, name: &str) -> Box<dyn HistogramMetric> {
        Box::new(OtelHistogram::new(
            self.work_duration.clone(),
            LabelSchema::WORKQUEUE.attributes(name),
        ))
    }

    fn new_unfinished_work_seconds_metric(&self, name: &str) -> Box<dyn SettableGaugeMetric> {
        Box::new(self.unfinished_work.handle(name))
    }

    fn new_longest_running_processor_seconds_metric(
        &self,
        name: &str,
    ) -> Box<dyn SettableGaugeMetric> {
        Box::new(self.longest_running_processor.handle(name))
    }

    fn new_retries_metric(&self, name: &str) -> Box<dyn CounterMetric> {
        Box::new(OtelCounter::new(
            self.retries.clone(),
            LabelSchema::WORKQUEUE.attributes(name),
        ))
    }
}
