//! Shared utilities for integration tests.
//!
//! Runs instruments through a real SDK pipeline with an in-memory exporter
//! and reads the exported data points back after a forced flush.

#![allow(dead_code)]

use opentelemetry::metrics::{Meter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::data::{Gauge, Histogram, Metric, ResourceMetrics, Sum};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::testing::metrics::InMemoryMetricExporter;

/// In-memory meter provider for one test.
pub struct MetricsHarness {
    exporter: InMemoryMetricExporter,
    provider: SdkMeterProvider,
}

impl MetricsHarness {
    /// Must be called inside a multi-threaded Tokio runtime.
    pub fn new() -> Self {
        let exporter = InMemoryMetricExporter::default();
        let reader = PeriodicReader::builder(exporter.clone(), runtime::Tokio)
            .build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        Self { exporter, provider }
    }

    pub fn meter(&self) -> Meter {
        self.provider.meter("controlloop-test")
    }

    /// Force a collection and return only what it exported.
    pub fn collect(&self) -> Collected {
        self.exporter.reset();
        self.provider.force_flush().expect("force flush metrics");
        Collected(
            self.exporter
                .get_finished_metrics()
                .expect("finished metrics"),
        )
    }
}

/// One exported histogram data point.
#[derive(Debug)]
pub struct HistogramPoint {
    pub count: u64,
    pub sum: f64,
    pub bounds: Vec<f64>,
    pub bucket_counts: Vec<u64>,
}

/// Exported metrics from a single collection.
pub struct Collected(Vec<ResourceMetrics>);

fn same_attributes(recorded: &[KeyValue], expected: &[KeyValue]) -> bool {
    recorded.len() == expected.len() && expected.iter().all(|kv| recorded.contains(kv))
}

impl Collected {
    fn metric(&self, name: &str) -> Option<&Metric> {
        self.0
            .iter()
            .flat_map(|resource| resource.scope_metrics.iter())
            .flat_map(|scope| scope.metrics.iter())
            .find(|metric| metric.name == name)
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metric(name).is_some()
    }

    pub fn u64_sum(&self, name: &str, attributes: &[KeyValue]) -> Option<u64> {
        let sum = self
            .metric(name)?
            .data
            .as_any()
            .downcast_ref::<Sum<u64>>()?;
        sum.data_points
            .iter()
            .find(|dp| same_attributes(&dp.attributes, attributes))
            .map(|dp| dp.value)
    }

    pub fn u64_sum_series(&self, name: &str) -> Vec<Vec<KeyValue>> {
        self.metric(name)
            .and_then(|metric| metric.data.as_any().downcast_ref::<Sum<u64>>())
            .map(|sum| {
                sum.data_points
                    .iter()
                    .map(|dp| dp.attributes.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn i64_sum(&self, name: &str, attributes: &[KeyValue]) -> Option<i64> {
        let sum = self
            .metric(name)?
            .data
            .as_any()
            .downcast_ref::<Sum<i64>>()?;
        sum.data_points
            .iter()
            .find(|dp| same_attributes(&dp.attributes, attributes))
            .map(|dp| dp.value)
    }

    pub fn f64_gauge(&self, name: &str, attributes: &[KeyValue]) -> Option<f64> {
        let gauge = self
            .metric(name)?
            .data
            .as_any()
            .downcast_ref::<Gauge<f64>>()?;
        gauge
            .data_points
            .iter()
            .find(|dp| same_attributes(&dp.attributes, attributes))
            .map(|dp| dp.value)
    }

    /// Number of gauge data points; zero when the metric was not exported.
    pub fn f64_gauge_series(&self, name: &str) -> usize {
        self.metric(name)
            .and_then(|metric| metric.data.as_any().downcast_ref::<Gauge<f64>>())
            .map(|gauge| gauge.data_points.len())
            .unwrap_or(0)
    }

    pub fn histogram(&self, name: &str, attributes: &[KeyValue]) -> Option<HistogramPoint> {
        let histogram = self
            .metric(name)?
            .data
            .as_any()
            .downcast_ref::<Histogram<f64>>()?;
        histogram
            .data_points
            .iter()
            .find(|dp| same_attributes(&dp.attributes, attributes))
            .map(|dp| HistogramPoint {
                count: dp.count,
                sum: dp.sum,
                bounds: dp.bounds.clone(),
                bucket_counts: dp.bucket_counts.clone(),
            })
    }
}

pub fn controller(name: &str) -> KeyValue {
    KeyValue::new("controller", name.to_string())
}

pub fn queue(name: &str) -> KeyValue {
    KeyValue::new("name", name.to_string())
}

pub fn result(outcome: &str) -> KeyValue {
    KeyValue::new("result", outcome.to_string())
}
