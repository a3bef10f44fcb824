//! Process-scoped counter register with text exposition.
//!
//! Counters are keyed by metric name plus a label set. Labels are sorted by
//! name before keying, so the same labels passed in a different order address
//! the same counter. Each counter is an `AtomicU64` inside a `DashMap`, which
//! shards locking so concurrent requests rarely contend.

use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;

/// Counter of webhook deliveries, labeled by `result`.
pub const WEBHOOK_REQUESTS_TOTAL: &str = "webhook_requests_total";

/// Counter of all HTTP requests, labeled by `path` and `status`.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CounterKey {
    name: String,
    labels: Vec<(String, String)>,
}

impl CounterKey {
    fn new(name: &str, labels: &[(&str, &str)]) -> Self {
        let mut labels: Vec<(String, String)> =
            labels.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        labels.sort();

        Self { name: name.to_string(), labels }
    }

    fn render(&self, value: u64, out: &mut String) {
        if self.labels.is_empty() {
            let _ = writeln!(out, "{} {}", self.name, value);
            return;
        }

        let labels = self
            .labels
            .iter()
            .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{}{{{}}} {}", self.name, labels, value);
    }
}

/// Escapes a label value for the exposition format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Monotonic counters, empty at startup and never persisted.
#[derive(Debug, Default)]
pub struct Metrics {
    counters: DashMap<CounterKey, AtomicU64>,
}

impl Metrics {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter identified by `name` and `labels` by one,
    /// creating it on first use.
    pub fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        let key = CounterKey::new(name, labels);

        if let Some(counter) = self.counters.get(&key) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.counters.entry(key).or_insert_with(|| AtomicU64::new(0)).fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of a counter, zero if it was never incremented.
    pub fn get(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.counters
            .get(&CounterKey::new(name, labels))
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }

    /// Renders every counter as one `name{labels} value` line.
    ///
    /// Lines are sorted so scrapes are stable between calls. Concurrent
    /// increments may or may not be reflected.
    pub fn render_text(&self) -> String {
        let mut entries: Vec<(CounterKey, u64)> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();
        entries.sort_by(|a, b| a.0.name.cmp(&b.0.name).then_with(|| a.0.labels.cmp(&b.0.labels)));

        let mut out = String::new();
        for (key, value) in &entries {
            key.render(*value, &mut out);
        }
        out
    }
}
