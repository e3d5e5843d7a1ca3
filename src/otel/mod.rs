//! OpenTelemetry-backed metrics providers.
//!
//! OpenTelemetry offers synchronous instruments (counter, up-down counter,
//! histogram) and observable instruments that can only be read from a
//! collection callback. The handle contracts in [`crate::interfaces`] map
//! onto them as follows:
//!
//! | Handle                | Backend                                        |
//! |-----------------------|------------------------------------------------|
//! | `CounterMetric`       | `Counter<u64>`                                 |
//! | `LabeledCounterMetric`| `Counter<u64>` + `result` attribute            |
//! | `HistogramMetric`     | `Histogram<f64>` with configured buckets       |
//! | `GaugeMetric`         | `UpDownCounter<i64>` through [`DeltaGauge`]    |
//! | `SettableGaugeMetric` | `ObservableGauge<f64>` through [`LatestValueStore`] |

pub mod attributes;
pub mod buckets;
pub mod controller;
pub mod counter;
pub mod delta_gauge;
pub mod histogram;
pub mod latest_value;
pub(crate) mod validation;
pub mod workqueue;

pub use attributes::{LabelKey, LabelSchema};
pub use controller::{OtelControllerMetrics, CONTROLLER_METER_NAME};
pub use counter::{OtelCounter, OtelLabeledCounter};
pub use delta_gauge::{Accumulator, DeltaGauge, DeltaGaugeFamily, GaugeValue};
pub use histogram::OtelHistogram;
pub use latest_value::{LatestValueStore, ObservedGauge, StoreGauge};
pub use workqueue::{OtelWorkqueueMetrics, WORKQUEUE_METER_NAME};
