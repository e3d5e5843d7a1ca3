//! Settable gauges on top of observable instruments.
//!
//! Observable gauges are read from a callback at collection time and can't
//! be written by application code. Writers upsert into a
//! [`LatestValueStore`] instead; the single callback registered for the
//! instrument copies the store and emits one observation per key.
//!
//! Concurrent `set` calls for the same key are not ordered: the last write
//! to complete wins. Each key belongs to one controller or queue, so this
//! is accepted rather than serialized.
//!
//! Entries are never evicted. Keys are expected to come from the small,
//! fixed set of controller and queue names created at startup.

use std::borrow::Cow;
use std::sync::Arc;

use dashmap::DashMap;
use opentelemetry::metrics::{Meter, ObservableGauge};
use tracing::debug;

use super::attributes::{LabelKey, LabelSchema};
use crate::interfaces::SettableGaugeMetric;

/// Most recent value per label key.
#[derive(Debug, Default)]
pub struct LatestValueStore {
    values: DashMap<LabelKey, f64>,
}

impl LatestValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value stored for `key`.
    pub fn set(&self, key: LabelKey, value: f64) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &LabelKey) -> Option<f64> {
        self.values.get(key).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of every entry.
    ///
    /// Shard locks are held only while copying, never while the caller
    /// processes the result.
    pub fn snapshot(&self) -> Vec<(LabelKey, f64)> {
        self.values
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Call `emit` once per stored key with its latest value.
    pub fn collect(&self, mut emit: impl FnMut(&LabelKey, f64)) {
        for (key, value) in self.snapshot() {
            emit(&key, value);
        }
    }
}

/// Settable gauge handle writing into a [`LatestValueStore`].
#[derive(Debug, Clone)]
pub struct StoreGauge {
    key: LabelKey,
    store: Arc<LatestValueStore>,
}

impl StoreGauge {
    pub fn new(store: Arc<LatestValueStore>, name: &str) -> Self {
        Self {
            key: LabelKey::new(name),
            store,
        }
    }

    pub fn key(&self) -> &LabelKey {
        &self.key
    }
}

impl SettableGaugeMetric for StoreGauge {
    fn set(&self, value: f64) {
        if !value.is_finite() {
            debug!(value, key = %self.key, "Dropping non-finite gauge value");
            return;
        }
        self.store.set(self.key.clone(), value);
    }
}

/// Observable gauge plus the store its callback drains.
pub struct ObservedGauge {
    store: Arc<LatestValueStore>,
    _instrument: ObservableGauge<f64>,
}

impl ObservedGauge {
    /// Build the instrument and register its collection callback.
    ///
    /// The callback lives as long as the meter provider; it is registered
    /// exactly once here.
    pub fn register(
        meter: &Meter,
        name: impl Into<Cow<'static, str>>,
        description: &'static str,
        unit: Option<&'static str>,
        schema: LabelSchema,
    ) -> Self {
        let store = Arc::new(LatestValueStore::new());
        let source = Arc::clone(&store);

        let mut builder = meter
            .f64_observable_gauge(name)
            .with_description(description)
            .with_callback(move |observer| {
                source.collect(|key, value| {
                    observer.observe(value, &schema.key_attributes(key))
                });
            });
        if let Some(unit) = unit {
            builder = builder.with_unit(unit);
        }

        Self {
            store,
            _instrument: builder.build(),
        }
    }

    /// Handle bound to `name`.
    pub fn handle(&self, name: &str) -> StoreGauge {
        StoreGauge::new(Arc::clone(&self.store), name)
    }

    pub fn store(&self) -> &LatestValueStore {
        &self.store
    }
}
