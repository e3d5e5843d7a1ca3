//! Histogram handle.

use std::sync::Arc;

use opentelemetry::metrics::Histogram;
use opentelemetry::KeyValue;
use tracing::debug;

use crate::interfaces::HistogramMetric;

/// Histogram bound to a fixed attribute set.
///
/// Bucket boundaries are set when the instrument is built; the handle
/// does not know them.
#[derive(Clone)]
pub struct OtelHistogram {
    histogram: Histogram<f64>,
    attributes: Arc<[KeyValue]>,
}

impl OtelHistogram {
    pub fn new(histogram: Histogram<f64>, attributes: Vec<KeyValue>) -> Self {
        Self {
            histogram,
            attributes: attributes.into(),
        }
    }
}

impl HistogramMetric for OtelHistogram {
    fn observe(&self, value: f64) {
        if !value.is_finite() {
            debug!(value, "Dropping non-finite histogram sample");
            return;
        }
        self.histogram.record(value, &self.attributes);
    }
}
