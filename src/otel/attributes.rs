//! Label keys and fixed attribute sets.

use std::fmt;
use std::sync::Arc;

use opentelemetry::KeyValue;

/// Identifying label of controller series.
pub const CONTROLLER_LABEL: &str = "controller";

/// Identifying label of work queue series.
pub const WORKQUEUE_LABEL: &str = "name";

/// Outcome label appended by labeled counters.
pub const RESULT_LABEL: &str = "result";

/// Identifies one logical series within an instrument.
///
/// Handles built with the same name produce equal keys and share a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey(Arc<str>);

impl LabelKey {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LabelKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The attribute key a family of series is identified by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSchema {
    key: &'static str,
}

impl LabelSchema {
    /// `controller=<name>`
    pub const CONTROLLER: Self = Self::new(CONTROLLER_LABEL);

    /// `name=<name>`
    pub const WORKQUEUE: Self = Self::new(WORKQUEUE_LABEL);

    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }

    /// Fixed attribute set binding the identifying label to `name`.
    pub fn attributes(&self, name: &str) -> Vec<KeyValue> {
        vec![KeyValue::new(self.key, name.to_string())]
    }

    /// Attribute set for an existing label key.
    pub fn key_attributes(&self, key: &LabelKey) -> Vec<KeyValue> {
        self.attributes(key.as_str())
    }
}

/// Copy `base` and append a single `result` label.
///
/// The base set is never modified, so repeated calls cannot stack
/// outcome labels.
pub fn with_result(base: &[KeyValue], result: &str) -> Vec<KeyValue> {
    let mut attributes = Vec::with_capacity(base.len() + 1);
    attributes.extend_from_slice(base);
    attributes.push(KeyValue::new(RESULT_LABEL, result.to_string()));
    attributes
}
