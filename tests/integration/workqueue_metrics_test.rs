//! Work queue metrics through the OpenTelemetry SDK.

use std::time::Duration;

use controlloop_otel::config::WorkqueueMetricsConfig;
use controlloop_otel::interfaces::{
    CounterMetric, GaugeMetric, HistogramMetric, SettableGaugeMetric, WorkqueueMetricsProvider,
};
use controlloop_otel::otel::buckets::WORKQUEUE_BUCKETS;
use controlloop_otel::{OtelWorkqueueMetrics, WorkqueueInstruments};

use crate::common::{queue, MetricsHarness};

fn provider(harness: &MetricsHarness) -> OtelWorkqueueMetrics {
    OtelWorkqueueMetrics::new(&harness.meter(), &WorkqueueMetricsConfig::default())
        .expect("default workqueue config is valid")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_adds_and_retries_are_separate_counters() {
    let harness = MetricsHarness::new();
    let metrics = provider(&harness);

    let adds = metrics.new_adds_metric("orders");
    adds.inc();
    adds.inc();
    adds.inc();
    metrics.new_retries_metric("orders").inc();

    let collected = harness.collect();
    assert_eq!(
        collected.u64_sum("workqueue_adds", &[queue("orders")]),
        Some(3)
    );
    assert_eq!(
        collected.u64_sum("workqueue_retries", &[queue("orders")]),
        Some(1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_latency_bucket_placement() {
    let harness = MetricsHarness::new();
    let metrics = provider(&harness);

    metrics.new_latency_metric("orders").observe(0.003);

    let point = harness
        .collect()
        .histogram("workqueue_queue_latency_seconds", &[queue("orders")])
        .expect("histogram exported");

    assert_eq!(point.bounds, WORKQUEUE_BUCKETS.to_vec());
    // (1e-3, 1e-2]
    assert_eq!(point.bucket_counts[6], 1);
    assert_eq!(point.count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_work_duration_uses_its_own_buckets() {
    let harness = MetricsHarness::new();
    let config = WorkqueueMetricsConfig {
        work_duration_buckets: vec![0.5, 5.0],
        ..Default::default()
    };
    let meter = harness.meter();
    let metrics = OtelWorkqueueMetrics::new(&meter, &config).unwrap();

    metrics.new_work_duration_metric("orders").observe(2.0);
    metrics.new_latency_metric("orders").observe(2.0);

    let collected = harness.collect();
    let work = collected
        .histogram("workqueue_work_duration_seconds", &[queue("orders")])
        .expect("work duration exported");
    assert_eq!(work.bounds, vec![0.5, 5.0]);
    assert_eq!(work.bucket_counts, vec![0, 1, 0]);

    let latency = collected
        .histogram("workqueue_queue_latency_seconds", &[queue("orders")])
        .expect("latency exported");
    assert_eq!(latency.bounds, WORKQUEUE_BUCKETS.to_vec());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_depth_tracks_adds_and_sets() {
    let harness = MetricsHarness::new();
    let metrics = provider(&harness);
    let depth = metrics.new_depth_metric("orders");

    depth.inc();
    depth.inc();
    depth.inc();
    depth.dec();
    assert_eq!(
        harness
            .collect()
            .i64_sum("workqueue_depth", &[queue("orders")]),
        Some(2)
    );

    depth.set(7.0);
    assert_eq!(
        harness
            .collect()
            .i64_sum("workqueue_depth", &[queue("orders")]),
        Some(7)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_seconds_gauges_have_independent_stores() {
    let harness = MetricsHarness::new();
    let metrics = provider(&harness);

    metrics
        .new_unfinished_work_seconds_metric("orders")
        .set(12.5);
    metrics
        .new_longest_running_processor_seconds_metric("orders")
        .set(3.0);
    metrics
        .new_longest_running_processor_seconds_metric("billing")
        .set(1.0);

    let collected = harness.collect();
    assert_eq!(
        collected.f64_gauge("workqueue_unfinished_work_seconds", &[queue("orders")]),
        Some(12.5)
    );
    assert_eq!(
        collected.f64_gauge_series("workqueue_unfinished_work_seconds"),
        1
    );
    assert_eq!(
        collected.f64_gauge(
            "workqueue_longest_running_processor_seconds",
            &[queue("orders")],
        ),
        Some(3.0)
    );
    assert_eq!(
        collected.f64_gauge_series("workqueue_longest_running_processor_seconds"),
        2
    );
    assert_eq!(metrics.unfinished_work().len(), 1);
    assert_eq!(metrics.longest_running_processor().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_instrument_bundle_flow() {
    let harness = MetricsHarness::new();
    let metrics = provider(&harness);
    let instruments = WorkqueueInstruments::new(&metrics, "orders");

    instruments.added();
    instruments.added();
    instruments.taken(Duration::from_millis(3));
    instruments.done(Duration::from_millis(40));
    instruments.update_unfinished_work(Duration::from_secs(2), Duration::from_secs(1));

    let collected = harness.collect();
    assert_eq!(
        collected.u64_sum("workqueue_adds", &[queue("orders")]),
        Some(2)
    );
    assert_eq!(
        collected.i64_sum("workqueue_depth", &[queue("orders")]),
        Some(1)
    );
    assert_eq!(
        collected
            .histogram("workqueue_queue_latency_seconds", &[queue("orders")])
            .map(|point| point.count),
        Some(1)
    );
    assert_eq!(
        collected
            .histogram("workqueue_work_duration_seconds", &[queue("orders")])
            .map(|point| point.count),
        Some(1)
    );
    assert_eq!(
        collected.f64_gauge("workqueue_unfinished_work_seconds", &[queue("orders")]),
        Some(2.0)
    );
    assert_eq!(
        collected.f64_gauge(
            "workqueue_longest_running_processor_seconds",
            &[queue("orders")],
        ),
        Some(1.0)
    );
}
