use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{label_pairs, Collector, MetricDesc, MetricKind};

/// Monotonic counter keyed by a fixed-arity label tuple.
pub struct CounterVec<const N: usize> {
    desc: MetricDesc<N>,
    map: DashMap<[String; N], AtomicU64>,
}

impl<const N: usize> CounterVec<N> {
    pub fn new(desc: MetricDesc<N>) -> Self {
        Self {
            desc,
            map: DashMap::new(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self, values: [&str; N]) {
        self.add(values, 1);
    }

    /// Increment by an arbitrary value. Creates the tuple at zero on first use.
    ///
    /// Existing tuples are updated under the shard's read lock, so writers do
    /// not serialize with each other or with a concurrent render.
    pub fn add(&self, values: [&str; N], v: u64) {
        let key = values.map(str::to_owned);
        if let Some(counter) = self.map.get(&key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        self.map
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a tuple; 0 if it was never recorded.
    pub fn get(&self, values: [&str; N]) -> u64 {
        let key = values.map(str::to_owned);
        self.map
            .get(&key)
            .map(|c| c.value().load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Number of distinct label tuples recorded so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl<const N: usize> Collector for CounterVec<N> {
    fn name(&self) -> &'static str {
        self.desc.name
    }

    fn help(&self) -> &'static str {
        self.desc.help
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn label_names(&self) -> &[&'static str] {
        &self.desc.label_names
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn render_samples(&self, out: &mut String) {
        let mut rows: Vec<([String; N], u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let name = self.desc.name;
        for (key, val) in rows {
            if N == 0 {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let labels = label_pairs(&self.desc.label_names, &key);
                let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
            }
        }
    }
}
