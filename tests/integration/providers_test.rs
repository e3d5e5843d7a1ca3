//! Provider resolution through `MetricsOptions`.

use std::sync::Arc;

use controlloop_otel::interfaces::{
    ControllerMetricsProvider, CounterMetric, LabeledCounterMetric, WorkqueueMetricsProvider,
};
use controlloop_otel::{Config, MetricsError, MetricsOptions, NoopMetricsProvider};

use crate::common::{controller, queue, result, MetricsHarness};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_with_meter_builds_otel_providers() {
    let harness = MetricsHarness::new();
    let providers = MetricsOptions::new()
        .with_meter(harness.meter())
        .build(&Config::default())
        .unwrap();

    providers
        .controller
        .new_reconcile_total_metric("orders")
        .inc_labeled("success");
    providers.workqueue.new_adds_metric("orders").inc();

    let collected = harness.collect();
    assert_eq!(
        collected.u64_sum(
            "controlloop_reconcile",
            &[controller("orders"), result("success")],
        ),
        Some(1)
    );
    assert_eq!(
        collected.u64_sum("workqueue_adds", &[queue("orders")]),
        Some(1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_disabled_config_records_nothing() {
    let harness = MetricsHarness::new();
    let mut config = Config::default();
    config.telemetry.enabled = false;

    let providers = MetricsOptions::new()
        .with_meter(harness.meter())
        .build(&config)
        .unwrap();

    providers
        .controller
        .new_reconcile_errors_metric("orders")
        .inc();
    providers.workqueue.new_retries_metric("orders").inc();

    let collected = harness.collect();
    assert!(!collected.has_metric("controlloop_reconcile_errors"));
    assert!(!collected.has_metric("workqueue_retries"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_supplied_provider_wins_over_meter() {
    let harness = MetricsHarness::new();
    let providers = MetricsOptions::new()
        .with_meter(harness.meter())
        .with_controller_provider(Arc::new(NoopMetricsProvider))
        .build(&Config::default())
        .unwrap();

    providers
        .controller
        .new_reconcile_errors_metric("orders")
        .inc();
    providers.workqueue.new_retries_metric("orders").inc();

    let collected = harness.collect();
    assert!(!collected.has_metric("controlloop_reconcile_errors"));
    assert_eq!(
        collected.u64_sum("workqueue_retries", &[queue("orders")]),
        Some(1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_config_stops_build() {
    let harness = MetricsHarness::new();
    let mut config = Config::default();
    config.workqueue.latency_buckets.clear();

    let result = MetricsOptions::new()
        .with_meter(harness.meter())
        .build(&config);
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shared_meter_rejects_names_reused_across_providers() {
    let harness = MetricsHarness::new();
    let mut config = Config::default();
    config.controller.reconcile_errors = config.workqueue.adds.clone();

    let result = MetricsOptions::new()
        .with_meter(harness.meter())
        .build(&config);
    assert!(matches!(
        result,
        Err(MetricsError::DuplicateInstrumentName(name)) if name == "workqueue_adds"
    ));
    assert!(!harness.collect().has_metric("workqueue_adds"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reused_name_allowed_when_one_provider_is_supplied() {
    let harness = MetricsHarness::new();
    let mut config = Config::default();
    config.controller.reconcile_errors = config.workqueue.adds.clone();

    let providers = MetricsOptions::new()
        .with_meter(harness.meter())
        .with_controller_provider(Arc::new(NoopMetricsProvider))
        .build(&config)
        .unwrap();
    providers.workqueue.new_adds_metric("orders").inc();

    assert_eq!(
        harness
            .collect()
            .u64_sum("workqueue_adds", &[queue("orders")]),
        Some(1)
    );
}
