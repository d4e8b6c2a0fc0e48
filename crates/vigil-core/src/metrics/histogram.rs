use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{fmt_float, label_pairs, Collector, MetricDesc, MetricKind};
use crate::error::{Result, VigilError};

/// Standard latency buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// One label tuple's accumulator.
///
/// Buckets are cumulative. A writer bumps `count`, then `sum`, then buckets
/// from the largest bound down; a reader loads buckets from the smallest bound
/// up, then `sum`, then `count`. A reader that sees a bucket increment
/// therefore also sees the matching larger buckets, sum and count.
struct AtomicHistogram {
    count: AtomicU64,
    sum_bits: AtomicU64,
    buckets: Box<[AtomicU64]>,
}

impl AtomicHistogram {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn observe(&self, bounds: &[f64], v: f64) {
        self.count.fetch_add(1, Ordering::AcqRel);
        let _ = self
            .sum_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + v).to_bits())
            });

        // First bound with v <= le; every bucket from there up counts v.
        // NaN satisfies no bound and only reaches `+Inf` through `count`.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let first = bounds.partition_point(|&le| !(v <= le));
        for b in self.buckets[first..].iter().rev() {
            b.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn snapshot(&self) -> HistogramSnapshot {
        let buckets = self
            .buckets
            .iter()
            .map(|b| b.load(Ordering::Acquire))
            .collect();
        let sum = f64::from_bits(self.sum_bits.load(Ordering::Acquire));
        let count = self.count.load(Ordering::Acquire);
        HistogramSnapshot { buckets, sum, count }
    }
}

/// Point-in-time copy of one tuple's state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Cumulative counts, one per configured bound (`+Inf` excluded).
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

/// Histogram keyed by a fixed-arity label tuple, with fixed bucket bounds.
pub struct HistogramVec<const N: usize> {
    desc: MetricDesc<N>,
    bounds: Box<[f64]>,
    map: DashMap<[String; N], AtomicHistogram>,
}

impl<const N: usize> HistogramVec<N> {
    /// Histogram over [`DEFAULT_BUCKETS`].
    pub fn new(desc: MetricDesc<N>) -> Self {
        Self {
            desc,
            bounds: DEFAULT_BUCKETS.into(),
            map: DashMap::new(),
        }
    }

    /// Histogram over custom bounds. Bounds must be non-empty, finite and
    /// strictly increasing; `+Inf` is implicit.
    pub fn with_buckets(desc: MetricDesc<N>, bounds: &[f64]) -> Result<Self> {
        if bounds.is_empty() {
            return Err(VigilError::InvalidBuckets(format!(
                "{}: at least one bucket bound is required",
                desc.name
            )));
        }
        if let Some(bad) = bounds.iter().find(|b| !b.is_finite()) {
            return Err(VigilError::InvalidBuckets(format!(
                "{}: bound {} is not finite",
                desc.name, bad
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(VigilError::InvalidBuckets(format!(
                "{}: bounds must be strictly increasing",
                desc.name
            )));
        }
        Ok(Self {
            desc,
            bounds: bounds.into(),
            map: DashMap::new(),
        })
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Record one observation. Creates the tuple on first use.
    ///
    /// Existing tuples are updated under the shard's read lock; the write
    /// lock is only taken to insert a new tuple.
    pub fn observe(&self, values: [&str; N], v: f64) {
        let key = values.map(str::to_owned);
        if let Some(hist) = self.map.get(&key) {
            hist.observe(&self.bounds, v);
            return;
        }
        let n = self.bounds.len();
        self.map
            .entry(key)
            .or_insert_with(|| AtomicHistogram::new(n))
            .observe(&self.bounds, v);
    }

    /// Snapshot of one tuple, `None` if it was never recorded.
    pub fn snapshot(&self, values: [&str; N]) -> Option<HistogramSnapshot> {
        let key = values.map(str::to_owned);
        self.map.get(&key).map(|h| h.value().snapshot())
    }
}

impl<const N: usize> Collector for HistogramVec<N> {
    fn name(&self) -> &'static str {
        self.desc.name
    }

    fn help(&self) -> &'static str {
        self.desc.help
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn label_names(&self) -> &[&'static str] {
        &self.desc.label_names
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn render_samples(&self, out: &mut String) {
        let mut rows: Vec<([String; N], HistogramSnapshot)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let name = self.desc.name;
        for (key, snap) in rows {
            let label_str = label_pairs(&self.desc.label_names, &key);
            let prefix = if label_str.is_empty() {
                String::new()
            } else {
                format!("{},", label_str)
            };
            let suffix = if label_str.is_empty() {
                String::new()
            } else {
                format!("{{{}}}", label_str)
            };

            for (le, count) in self.bounds.iter().zip(&snap.buckets) {
                let le = fmt_float(*le);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, snap.count);
            let _ = writeln!(out, "{}_sum{} {}", name, suffix, fmt_float(snap.sum));
            let _ = writeln!(out, "{}_count{} {}", name, suffix, snap.count);
        }
    }
}
