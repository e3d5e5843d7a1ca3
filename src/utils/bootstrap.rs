//! Bootstrap utilities for processes exporting controlloop metrics.

use std::time::Duration;

use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::metrics::{MeterProviderBuilder, SdkMeterProvider};
use opentelemetry_sdk::Resource;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryConfig;
use crate::interfaces::Result;

/// Initialize tracing with CONTROLLOOP_LOG environment variable.
///
/// Defaults to "info" level if CONTROLLOOP_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("CONTROLLOOP_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Meter provider builder carrying the service resource and, when an
/// endpoint is configured, a periodic OTLP reader.
///
/// Callers may add further readers before building. With an OTLP endpoint
/// this must run inside a Tokio runtime.
pub fn meter_provider_builder(config: &TelemetryConfig) -> Result<MeterProviderBuilder> {
    let resource = Resource::new([KeyValue::new("service.name", config.service_name.clone())]);
    let builder = SdkMeterProvider::builder().with_resource(resource);
    let interval = Duration::from_secs(config.export_interval_secs);

    match &config.otlp_endpoint {
        Some(endpoint) => otlp_reader(builder, endpoint, interval),
        None => {
            info!("No OTLP endpoint configured, metrics are not exported");
            Ok(builder)
        }
    }
}

#[cfg(feature = "otlp")]
fn otlp_reader(
    builder: MeterProviderBuilder,
    endpoint: &str,
    interval: Duration,
) -> Result<MeterProviderBuilder> {
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::metrics::PeriodicReader;
    use opentelemetry_sdk::runtime;

    use crate::interfaces::MetricsError;

    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| MetricsError::Exporter(e.to_string()))?;

    let reader = PeriodicReader::builder(exporter, runtime::Tokio)
        .with_interval(interval)
        .build();

    info!(
        endpoint,
        interval_secs = interval.as_secs(),
        "OTLP metric export enabled"
    );
    Ok(builder.with_reader(reader))
}

#[cfg(not(feature = "otlp"))]
fn otlp_reader(
    builder: MeterProviderBuilder,
    endpoint: &str,
    _interval: Duration,
) -> Result<MeterProviderBuilder> {
    tracing::warn!(
        endpoint,
        "OTLP endpoint configured but the otlp feature is disabled, metrics are not exported"
    );
    Ok(builder)
}

/// Build a meter provider from the telemetry config.
pub fn build_meter_provider(config: &TelemetryConfig) -> Result<SdkMeterProvider> {
    Ok(meter_provider_builder(config)?.build())
}

/// Build the meter provider and install it as the global provider.
///
/// Returns the provider so the caller can flush or shut it down on exit.
pub fn install_meter_provider(config: &TelemetryConfig) -> Result<SdkMeterProvider> {
    let provider = build_meter_provider(config)?;
    global::set_meter_provider(provider.clone());
    Ok(provider)
}
