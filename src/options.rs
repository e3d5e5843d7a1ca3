//! Provider and controller options.
//!
//! `MetricsOptions` decides which providers reconcilers and work queues
//! receive; `ControllerOptions` carries per-controller settings that are
//! also published as metrics.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::metrics::Meter;
use tracing::info;

use crate::config::{ensure_unique_across, Config};
use crate::interfaces::{ControllerMetricsProvider, MetricsError, Result, WorkqueueMetricsProvider};
use crate::noop::NoopMetricsProvider;
use crate::otel::{OtelControllerMetrics, OtelWorkqueueMetrics};

/// Providers shared by every reconciler and work queue in the process.
#[derive(Clone)]
pub struct MetricsProviders {
    pub controller: Arc<dyn ControllerMetricsProvider>,
    pub workqueue: Arc<dyn WorkqueueMetricsProvider>,
}

impl MetricsProviders {
    /// Providers that record nothing.
    pub fn noop() -> Self {
        Self {
            controller: Arc::new(NoopMetricsProvider),
            workqueue: Arc::new(NoopMetricsProvider),
        }
    }
}

/// Options for assembling [`MetricsProviders`].
///
/// Resolution order per provider:
/// 1. an explicitly supplied provider
/// 2. no-op, when `telemetry.enabled` is false
/// 3. OpenTelemetry instruments on the supplied meter
/// 4. OpenTelemetry instruments on the global `controlloop` / `workqueue` meters
#[derive(Clone, Default)]
pub struct MetricsOptions {
    meter: Option<Meter>,
    controller_provider: Option<Arc<dyn ControllerMetricsProvider>>,
    workqueue_provider: Option<Arc<dyn WorkqueueMetricsProvider>>,
}

impl MetricsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build both OpenTelemetry providers on `meter`.
    pub fn with_meter(mut self, meter: Meter) -> Self {
        self.meter = Some(meter);
        self
    }

    pub fn with_controller_provider(
        mut self,
        provider: Arc<dyn ControllerMetricsProvider>,
    ) -> Self {
        self.controller_provider = Some(provider);
        self
    }

    pub fn with_workqueue_provider(
        mut self,
        provider: Arc<dyn WorkqueueMetricsProvider>,
    ) -> Self {
        self.workqueue_provider = Some(provider);
        self
    }

    /// Resolve providers, creating every instrument now.
    ///
    /// Errors here are configuration errors and should stop startup.
    pub fn build(self, config: &Config) -> Result<MetricsProviders> {
        let enabled = config.telemetry.enabled;
        if !enabled {
            info!("Metrics disabled, using no-op providers where none were supplied");
            if self.controller_provider.is_none() && self.workqueue_provider.is_none() {
                return Ok(MetricsProviders::noop());
            }
        }

        // Both providers register on one meter, where a shared name would
        // merge two instruments into one.
        if enabled
            && self.meter.is_some()
            && self.controller_provider.is_none()
            && self.workqueue_provider.is_none()
        {
            ensure_unique_across(&config.controller, &config.workqueue)?;
        }

        let controller: Arc<dyn ControllerMetricsProvider> = match self.controller_provider {
            Some(provider) => provider,
            None if !enabled => Arc::new(NoopMetricsProvider),
            None => Arc::new(match &self.meter {
                Some(meter) => OtelControllerMetrics::new(meter, &config.controller)?,
                None => OtelControllerMetrics::from_global(&config.controller)?,
            }),
        };

        let workqueue: Arc<dyn WorkqueueMetricsProvider> = match self.workqueue_provider {
            Some(provider) => provider,
            None if !enabled => Arc::new(NoopMetricsProvider),
            None => Arc::new(match &self.meter {
                Some(meter) => OtelWorkqueueMetrics::new(meter, &config.workqueue)?,
                None => OtelWorkqueueMetrics::from_global(&config.workqueue)?,
            }),
        };

        Ok(MetricsProviders {
            controller,
            workqueue,
        })
    }
}

/// Retry backoff bounds for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub min: Duration,
    pub max: Duration,
}

/// Per-controller options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    concurrent_workers: usize,
    rate_limits: Option<RateLimits>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            concurrent_workers: 1,
            rate_limits: None,
        }
    }
}

impl ControllerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of concurrent reconciles.
    pub fn with_concurrent_workers(mut self, workers: usize) -> Self {
        self.concurrent_workers = workers;
        self
    }

    /// Override the work queue's retry backoff bounds.
    pub fn with_rate_limits(mut self, min: Duration, max: Duration) -> Self {
        self.rate_limits = Some(RateLimits { min, max });
        self
    }

    pub fn concurrent_workers(&self) -> usize {
        self.concurrent_workers
    }

    pub fn rate_limits(&self) -> Option<RateLimits> {
        self.rate_limits
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrent_workers == 0 {
            return Err(MetricsError::InvalidControllerOptions(
                "concurrent_workers must be at least 1".to_string(),
            ));
        }
        if let Some(limits) = self.rate_limits {
            if limits.min > limits.max {
                return Err(MetricsError::InvalidControllerOptions(format!(
                    "rate limit min {:?} exceeds max {:?}",
                    limits.min, limits.max
                )));
            }
        }
        Ok(())
    }
}
