//! Metric handle interfaces.
//!
//! A handle binds one instrument to one fixed label set. Handles are
//! handed out once at setup and then called from any number of threads.
//! None of these methods return errors: telemetry must never fail the
//! instrumented operation.

/// Monotonic counter.
pub trait CounterMetric: Send + Sync {
    /// Add exactly one.
    fn inc(&self);
}

/// Counter with a per-call outcome label.
pub trait LabeledCounterMetric: Send + Sync {
    /// Add exactly one to the series identified by the fixed label plus
    /// `result` (e.g. "success", "error", "requeue").
    fn inc_labeled(&self, result: &str);
}

/// Histogram recorder. Bucket boundaries belong to the instrument.
pub trait HistogramMetric: Send + Sync {
    /// Record one sample, in seconds for every duration instrument.
    fn observe(&self, value: f64);
}

/// Gauge that can only be set to an absolute value.
pub trait SettableGaugeMetric: Send + Sync {
    /// Replace the current value.
    fn set(&self, value: f64);
}

/// Gauge that can be moved relatively or set absolutely.
pub trait GaugeMetric: SettableGaugeMetric {
    /// Move the gauge by `n` (may be negative).
    fn add(&self, n: i64);

    fn inc(&self) {
        self.add(1);
    }

    fn dec(&self) {
        self.add(-1);
    }
}
