//! Counter handles.

use std::sync::Arc;

use opentelemetry::metrics::Counter;
use opentelemetry::KeyValue;

use super::attributes::with_result;
use crate::interfaces::{CounterMetric, LabeledCounterMetric};

/// Counter bound to a fixed attribute set.
#[derive(Clone)]
pub struct OtelCounter {
    counter: Counter<u64>,
    attributes: Arc<[KeyValue]>,
}

impl OtelCounter {
    pub fn new(counter: Counter<u64>, attributes: Vec<KeyValue>) -> Self {
        Self {
            counter,
            attributes: attributes.into(),
        }
    }
}

impl CounterMetric for OtelCounter {
    fn inc(&self) {
        self.counter.add(1, &self.attributes);
    }
}

/// Counter bound to a fixed attribute set plus a per-call `result` label.
#[derive(Clone)]
pub struct OtelLabeledCounter {
    counter: Counter<u64>,
    attributes: Arc<[KeyValue]>,
}

impl OtelLabeledCounter {
    pub fn new(counter: Counter<u64>, attributes: Vec<KeyValue>) -> Self {
        Self {
            counter,
            attributes: attributes.into(),
        }
    }
}

impl LabeledCounterMetric for OtelLabeledCounter {
    fn inc_labeled(&self, result: &str) {
        let attributes = with_result(&self.attributes, result);
        self.counter.add(1, &attributes);
    }
}
