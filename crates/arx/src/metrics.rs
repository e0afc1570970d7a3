//! Metrics collection and reporting using metrics-rs.
//!
//! The lifters record through the `metrics` facade. The CLI installs
//! [`CliRecorder`] to keep values in memory and print them at exit.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    describe_counter, describe_histogram,
};
use parking_lot::RwLock;

// ============================================================================
// Metric descriptions
// ============================================================================

/// Initialize metric descriptions.
///
/// Call this once at startup to register metric descriptions.
pub fn init() {
    describe_counter!(
        "arx_crc32_lifted_total",
        Unit::Count,
        "CRC32 instructions lifted, by code generation path and mnemonic"
    );
    describe_histogram!(
        "arx_graph_nodes",
        Unit::Count,
        "Operation graph size per translated instruction"
    );
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// Storage for counter values.
#[derive(Default)]
struct CounterStorage {
    values: RwLock<HashMap<String, u64>>,
}

/// Storage for histogram values.
#[derive(Default)]
struct HistogramStorage {
    values: RwLock<HashMap<String, Vec<f64>>>,
}

struct CliCounter {
    key: String,
    storage: Arc<CounterStorage>,
}

impl metrics::CounterFn for CliCounter {
    fn increment(&self, value: u64) {
        let mut values = self.storage.values.write();
        *values.entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        let mut values = self.storage.values.write();
        values.insert(self.key.clone(), value);
    }
}

struct CliHistogram {
    key: String,
    storage: Arc<HistogramStorage>,
}

impl metrics::HistogramFn for CliHistogram {
    fn record(&self, value: f64) {
        let mut values = self.storage.values.write();
        values.entry(self.key.clone()).or_default().push(value);
    }
}

/// CLI recorder that stores metrics for terminal output.
///
/// Gauges are not used by the translator and are dropped.
pub struct CliRecorder {
    counters: Arc<CounterStorage>,
    histograms: Arc<HistogramStorage>,
}

impl CliRecorder {
    /// Create a new CLI recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Arc::new(CounterStorage::default()),
            histograms: Arc::new(HistogramStorage::default()),
        }
    }

    /// Handle onto this recorder's storage, without installing it.
    #[must_use]
    pub fn handle(&self) -> CliRecorderHandle {
        CliRecorderHandle {
            counters: Arc::clone(&self.counters),
            histograms: Arc::clone(&self.histograms),
        }
    }

    /// Install this recorder as the global metrics recorder.
    ///
    /// Returns `None` if another recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = self.handle();
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }
}

impl Default for CliRecorder {
    fn default() -> Self {
        Self::new()
    }
}

fn key_to_string(key: &Key) -> String {
    let name = key.name();
    let mut labels: Vec<String> = key
        .labels()
        .map(|l| format!("{}={}", l.key(), l.value()))
        .collect();
    if labels.is_empty() {
        name.to_string()
    } else {
        labels.sort();
        format!("{name}{{{}}}", labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CliCounter {
            key: key_to_string(key),
            storage: Arc::clone(&self.counters),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(CliHistogram {
            key: key_to_string(key),
            storage: Arc::clone(&self.histograms),
        }))
    }
}

/// Handle for accessing recorded metrics after installing the CLI recorder.
pub struct CliRecorderHandle {
    counters: Arc<CounterStorage>,
    histograms: Arc<HistogramStorage>,
}

impl CliRecorderHandle {
    /// Get a counter value by key.
    #[must_use]
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.counters.values.read().get(key).copied()
    }

    /// Get histogram values by key.
    #[must_use]
    pub fn get_histogram(&self, key: &str) -> Option<Vec<f64>> {
        self.histograms.values.read().get(key).cloned()
    }

    /// Print all collected metrics in a human-readable format.
    pub fn print_summary(&self) {
        let counters = self.counters.values.read().clone();
        let histograms = self.histograms.values.read().clone();

        if counters.is_empty() && histograms.is_empty() {
            println!("No metrics collected.");
            return;
        }

        println!();
        println!("## Metrics Summary");
        println!();

        if !counters.is_empty() {
            println!("### Counters");
            let mut keys: Vec<_> = counters.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = counters.get(key) {
                    println!("  {key}: {value}");
                }
            }
            println!();
        }

        if !histograms.is_empty() {
            println!("### Histograms");
            let mut keys: Vec<_> = histograms.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(values) = histograms.get(key) {
                    if values.is_empty() {
                        continue;
                    }
                    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    #[allow(clippy::cast_precision_loss)]
                    let mean = values.iter().sum::<f64>() / values.len() as f64;
                    println!(
                        "  {key}: count={}, min={min:.1}, mean={mean:.1}, max={max:.1}",
                        values.len()
                    );
                }
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_collects_lift_counter() {
        let recorder = CliRecorder::new();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            let translator = crate::Translator::new(arx_a64::HostFeatures::none());
            translator.translate(0x1AC2_4020, 0).unwrap();
            translator.translate(0x1AC2_4020, 4).unwrap();
        });
        assert_eq!(
            handle.get_counter("arx_crc32_lifted_total{mnemonic=crc32b,path=fallback}"),
            Some(2)
        );
        assert_eq!(
            handle.get_histogram("arx_graph_nodes"),
            Some(vec![4.0, 4.0])
        );
        assert_eq!(handle.get_counter("arx_crc32_lifted_total"), None);
    }

    #[test]
    fn test_summary_releases_storage() {
        let recorder = CliRecorder::new();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("arx_test_total").increment(1);
            handle.print_summary();
            metrics::counter!("arx_test_total").increment(1);
        });
        assert_eq!(handle.get_counter("arx_test_total"), Some(2));
    }

    #[test]
    fn test_key_labels_sorted() {
        let key = Key::from_parts(
            "m",
            vec![metrics::Label::new("z", "1"), metrics::Label::new("a", "2")],
        );
        assert_eq!(key_to_string(&key), "m{a=2,z=1}");
    }
}
