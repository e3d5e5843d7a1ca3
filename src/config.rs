//! Configuration for controlloop metrics.
//!
//! Loaded from YAML files and environment variables through the `config`
//! crate.

use serde::Deserialize;

use crate::interfaces::MetricsError;
use crate::otel::buckets::{RECONCILE_TIME_BUCKETS, WORKQUEUE_BUCKETS};
use crate::otel::validation::{ensure_unique, validate_buckets, validate_instrument_name};

/// Default configuration file, read when present.
pub const DEFAULT_CONFIG_PATH: &str = "controlloop.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "CONTROLLOOP_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "CONTROLLOOP";
/// Standard OpenTelemetry endpoint variable, mapped to `telemetry.otlp_endpoint`.
pub const OTLP_ENDPOINT_ENV_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export and process-level telemetry settings.
    pub telemetry: TelemetryConfig,
    /// Controller instrument names and buckets.
    pub controller: ControllerMetricsConfig,
    /// Work queue instrument names and buckets.
    pub workqueue: WorkqueueMetricsConfig,
}

/// Telemetry export configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// When false, no-op providers are handed out.
    pub enabled: bool,
    /// `service.name` resource attribute.
    pub service_name: String,
    /// OTLP gRPC endpoint. Metrics stay in-process when unset.
    pub otlp_endpoint: Option<String>,
    /// Interval between periodic exports.
    pub export_interval_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "controlloop".to_string(),
            otlp_endpoint: None,
            export_interval_secs: 60,
        }
    }
}

/// Controller instrument configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerMetricsConfig {
    pub reconcile_total: String,
    pub reconcile_errors: String,
    pub reconcile_panics: String,
    pub reconcile_time: String,
    pub max_concurrent_reconciles: String,
    pub active_workers: String,
    /// Bucket boundaries for the reconcile time histogram, in seconds.
    pub reconcile_time_buckets: Vec<f64>,
}

impl Default for ControllerMetricsConfig {
    fn default() -> Self {
        Self {
            reconcile_total: "controlloop_reconcile".to_string(),
            reconcile_errors: "controlloop_reconcile_errors".to_string(),
            reconcile_panics: "controlloop_reconcile_panics".to_string(),
            reconcile_time: "controlloop_reconcile_time_seconds".to_string(),
            max_concurrent_reconciles: "controlloop_max_concurrent_reconciles".to_string(),
            active_workers: "controlloop_active_workers".to_string(),
            reconcile_time_buckets: RECONCILE_TIME_BUCKETS.to_vec(),
        }
    }
}

impl ControllerMetricsConfig {
    fn instrument_names(&self) -> [&str; 6] {
        [
            &self.reconcile_total,
            &self.reconcile_errors,
            &self.reconcile_panics,
            &self.reconcile_time,
            &self.max_concurrent_reconciles,
            &self.active_workers,
        ]
    }

    /// Check names and buckets before any instrument is created.
    pub fn validate(&self) -> Result<(), MetricsError> {
        for name in self.instrument_names() {
            validate_instrument_name(name)?;
        }
        ensure_unique(self.instrument_names())?;
        validate_buckets(&self.reconcile_time, &self.reconcile_time_buckets)
    }
}

/// Work queue instrument configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkqueueMetricsConfig {
    pub adds: String,
    pub retries: String,
    pub queue_latency: String,
    pub work_duration: String,
    pub depth: String,
    pub unfinished_work: String,
    pub longest_running_processor: String,
    /// Bucket boundaries for the queue latency histogram, in seconds.
    pub latency_buckets: Vec<f64>,
    /// Bucket boundaries for the work duration histogram, in seconds.
    pub work_duration_buckets: Vec<f64>,
}

impl Default for WorkqueueMetricsConfig {
    fn default() -> Self {
        Self {
            adds: "workqueue_adds".to_string(),
            retries: "workqueue_retries".to_string(),
            queue_latency: "workqueue_queue_latency_seconds".to_string(),
            work_duration: "workqueue_work_duration_seconds".to_string(),
            depth: "workqueue_depth".to_string(),
            unfinished_work: "workqueue_unfinished_work_seconds".to_string(),
            longest_running_processor: "workqueue_longest_running_processor_seconds".to_string(),
            latency_buckets: WORKQUEUE_BUCKETS.to_vec(),
            work_duration_buckets: WORKQUEUE_BUCKETS.to_vec(),
        }
    }
}

impl WorkqueueMetricsConfig {
    fn instrument_names(&self) -> [&str; 7] {
        [
            &self.adds,
            &self.retries,
            &self.queue_latency,
            &self.work_duration,
            &self.depth,
            &self.unfinished_work,
            &self.longest_running_processor,
        ]
    }

    /// Check names and buckets before any instrument is created.
    pub fn validate(&self) -> Result<(), MetricsError> {
        for name in self.instrument_names() {
            validate_instrument_name(name)?;
        }
        ensure_unique(self.instrument_names())?;
        validate_buckets(&self.queue_latency, &self.latency_buckets)?;
        validate_buckets(&self.work_duration, &self.work_duration_buckets)
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `controlloop.yaml` in current directory (if exists)
    /// 2. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 3. Environment variables with `CONFIG_ENV_PREFIX` prefix, nested keys
    ///    separated by `__` (e.g. `CONTROLLOOP_TELEMETRY__SERVICE_NAME`)
    /// 4. `OTEL_EXPORTER_OTLP_ENDPOINT` for `telemetry.otlp_endpoint`
    pub fn load() -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let defaults = File::new(DEFAULT_CONFIG_PATH, FileFormat::Yaml);
        let mut builder = ConfigLib::builder().add_source(defaults.required(false));

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            let file = File::new(&config_path, FileFormat::Yaml).required(true);
            builder = builder.add_source(file);
        }

        let endpoint = std::env::var(OTLP_ENDPOINT_ENV_VAR)
            .ok()
            .filter(|endpoint| !endpoint.is_empty());

        let config: Config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("telemetry.otlp_endpoint", endpoint)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single YAML file, without environment
    /// overrides.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, File, FileFormat};

        let config = ConfigLib::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(true))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// Instrument names must be unique across sections as well, since both
    /// providers may be built on one meter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.export_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "telemetry.export_interval_secs must be greater than zero".to_string(),
            ));
        }
        self.controller.validate()?;
        self.workqueue.validate()?;
        ensure_unique_across(&self.controller, &self.workqueue)?;
        Ok(())
    }
}

/// Reject instrument names shared between the controller and work queue
/// sections.
pub(crate) fn ensure_unique_across(
    controller: &ControllerMetricsConfig,
    workqueue: &WorkqueueMetricsConfig,
) -> Result<(), MetricsError> {
    ensure_unique(
        controller
            .instrument_names()
            .into_iter()
            .chain(workqueue.instrument_names()),
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
