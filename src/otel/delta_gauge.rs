//! Settable gauges on top of up-down counters.
//!
//! OpenTelemetry has no "set absolute value" for synchronous instruments,
//! only deltas. A [`DeltaGauge`] remembers the last value it applied per
//! label key and turns `set(v)` into `add(v - last)`:
//!
//! 1. lock the key's state
//! 2. `delta = convert(v) - last`
//! 3. if `delta != 0`: apply `delta` to the accumulator, `last = convert(v)`
//! 4. unlock
//!
//! Once `set(v)` returns, the accumulated total for the key equals `v`.
//! Repeating a value costs no backend write. `add`, `inc` and `dec` go
//! through the same lock so they never race with `set`.
//!
//! Integer accumulators truncate fractional values toward zero before the
//! delta is computed. `f64` accumulators keep them.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use opentelemetry::metrics::UpDownCounter;
use opentelemetry::KeyValue;
use tracing::{debug, warn};

use super::attributes::{LabelKey, LabelSchema};
use crate::interfaces::{GaugeMetric, SettableGaugeMetric};

/// Sink for signed deltas.
pub trait Accumulator<T>: Send + Sync {
    fn add(&self, delta: T, attributes: &[KeyValue]);
}

impl Accumulator<i64> for UpDownCounter<i64> {
    fn add(&self, delta: i64, attributes: &[KeyValue]) {
        UpDownCounter::add(self, delta, attributes);
    }
}

impl Accumulator<f64> for UpDownCounter<f64> {
    fn add(&self, delta: f64, attributes: &[KeyValue]) {
        UpDownCounter::add(self, delta, attributes);
    }
}

impl<T, A: Accumulator<T>> Accumulator<T> for Arc<A> {
    fn add(&self, delta: T, attributes: &[KeyValue]) {
        (**self).add(delta, attributes);
    }
}

/// Numeric type a [`DeltaGauge`] accumulates in.
pub trait GaugeValue: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Convert a requested gauge value.
    fn from_f64(value: f64) -> Self;

    fn from_i64(value: i64) -> Self;

    /// `self - last`
    fn delta(self, last: Self) -> Self;

    /// `self + delta`
    fn accumulate(self, delta: Self) -> Self;
}

impl GaugeValue for i64 {
    /// Truncates toward zero and saturates at the `i64` range.
    fn from_f64(value: f64) -> Self {
        value as i64
    }

    fn from_i64(value: i64) -> Self {
        value
    }

    fn delta(self, last: Self) -> Self {
        self.wrapping_sub(last)
    }

    fn accumulate(self, delta: Self) -> Self {
        self.wrapping_add(delta)
    }
}

impl GaugeValue for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn from_i64(value: i64) -> Self {
        value as f64
    }

    fn delta(self, last: Self) -> Self {
        self - last
    }

    fn accumulate(self, delta: Self) -> Self {
        self + delta
    }
}

/// Gauge handle for one label key.
///
/// Clones share state, as do handles handed out by the same
/// [`DeltaGaugeFamily`] for the same name.
pub struct DeltaGauge<T, A> {
    accumulator: A,
    attributes: Arc<[KeyValue]>,
    last: Arc<Mutex<T>>,
}

impl<T: GaugeValue, A: Accumulator<T>> DeltaGauge<T, A> {
    /// Standalone gauge with its own state.
    pub fn new(accumulator: A, attributes: Vec<KeyValue>) -> Self {
        Self {
            accumulator,
            attributes: attributes.into(),
            last: Arc::new(Mutex::new(T::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.last.lock().unwrap_or_else(|poisoned| {
            warn!(attributes = ?self.attributes, "Recovering poisoned gauge state");
            poisoned.into_inner()
        })
    }

    /// Apply a relative change.
    pub fn add_delta(&self, delta: T) {
        let mut last = self.lock();
        self.accumulator.add(delta, &self.attributes);
        *last = last.accumulate(delta);
    }

    /// Move the accumulated total to `value`.
    pub fn set_value(&self, value: f64) {
        if !value.is_finite() {
            debug!(value, attributes = ?self.attributes, "Dropping non-finite gauge value");
            return;
        }
        let target = T::from_f64(value);

        let mut last = self.lock();
        let delta = target.delta(*last);
        if delta != T::default() {
            self.accumulator.add(delta, &self.attributes);
            *last = target;
        }
    }

    /// Total applied so far.
    pub fn last(&self) -> T {
        *self.lock()
    }
}

impl<T, A: Clone> Clone for DeltaGauge<T, A> {
    fn clone(&self) -> Self {
        Self {
            accumulator: self.accumulator.clone(),
            attributes: Arc::clone(&self.attributes),
            last: Arc::clone(&self.last),
        }
    }
}

impl<T: GaugeValue, A: Accumulator<T>> SettableGaugeMetric for DeltaGauge<T, A> {
    fn set(&self, value: f64) {
        self.set_value(value);
    }
}

impl<T: GaugeValue, A: Accumulator<T>> GaugeMetric for DeltaGauge<T, A> {
    fn add(&self, n: i64) {
        self.add_delta(T::from_i64(n));
    }
}

/// All delta gauges of one instrument, keyed by label.
///
/// The per-key state lives here so that every handle for a name applies
/// its deltas against the same running total.
pub struct DeltaGaugeFamily<T, A> {
    accumulator: A,
    schema: LabelSchema,
    states: DashMap<LabelKey, Arc<Mutex<T>>>,
}

impl<T: GaugeValue, A: Accumulator<T> + Clone> DeltaGaugeFamily<T, A> {
    pub fn new(accumulator: A, schema: LabelSchema) -> Self {
        Self {
            accumulator,
            schema,
            states: DashMap::new(),
        }
    }

    /// Handle for `name`, sharing state with earlier handles for `name`.
    pub fn handle(&self, name: &str) -> DeltaGauge<T, A> {
        let last = self
            .states
            .entry(LabelKey::new(name))
            .or_default()
            .value()
            .clone();

        DeltaGauge {
            accumulator: self.accumulator.clone(),
            attributes: self.schema.attributes(name).into(),
            last,
        }
    }

    /// Number of distinct label keys seen.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
