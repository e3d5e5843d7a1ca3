//! Test utilities.
//!
//! [`RecordingAccumulator`] stands in for an up-down counter so tests can
//! assert on individual backend writes, which the SDK aggregates away.

use std::sync::{Mutex, PoisonError};

use opentelemetry::KeyValue;

use crate::otel::{Accumulator, GaugeValue};

/// Accumulator that remembers every delta it receives.
#[derive(Debug, Default)]
pub struct RecordingAccumulator<T> {
    writes: Mutex<Vec<(T, Vec<KeyValue>)>>,
}

impl<T: GaugeValue> RecordingAccumulator<T> {
    pub fn new() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every write, in order.
    pub fn writes(&self) -> Vec<(T, Vec<KeyValue>)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn deltas(&self) -> Vec<T> {
        self.writes().into_iter().map(|(delta, _)| delta).collect()
    }

    pub fn attribute_sets(&self) -> Vec<Vec<KeyValue>> {
        self.writes()
            .into_iter()
            .map(|(_, attributes)| attributes)
            .collect()
    }

    /// Sum of all deltas.
    pub fn total(&self) -> T {
        self.deltas()
            .into_iter()
            .fold(T::default(), |total, delta| total.accumulate(delta))
    }

    /// Sum of the deltas recorded with exactly `attributes`.
    pub fn total_for(&self, attributes: &[KeyValue]) -> T {
        self.writes()
            .into_iter()
            .filter(|(_, recorded)| recorded.as_slice() == attributes)
            .fold(T::default(), |total, (delta, _)| total.accumulate(delta))
    }
}

impl<T: GaugeValue> Accumulator<T> for RecordingAccumulator<T> {
    fn add(&self, delta: T, attributes: &[KeyValue]) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((delta, attributes.to_vec()));
    }
}
