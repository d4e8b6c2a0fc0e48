//! In-process metric instruments rendered in the Prometheus text format.
//!
//! Instruments are label vectors with a compile-time label arity: a
//! `CounterVec<3>` always carries exactly three label values, so label
//! cardinality cannot drift at runtime. Each label tuple owns its own set of
//! atomics inside a `DashMap`, created lazily on first use.

pub mod counter;
pub mod histogram;
pub mod http;
pub mod registry;

use std::fmt::Write;

pub use counter::CounterVec;
pub use histogram::{HistogramSnapshot, HistogramVec, DEFAULT_BUCKETS};
pub use http::HttpMetrics;
pub use registry::MetricRegistry;

/// Immutable metric descriptor: name, help text and ordered label names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc<const N: usize> {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: [&'static str; N],
}

impl<const N: usize> MetricDesc<N> {
    pub const fn new(
        name: &'static str,
        help: &'static str,
        label_names: [&'static str; N],
    ) -> Self {
        Self {
            name,
            help,
            label_names,
        }
    }
}

/// Exposition type written on the `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Anything the registry can hold and render.
pub trait Collector: Send + Sync {
    fn name(&self) -> &'static str;
    fn help(&self) -> &'static str;
    fn kind(&self) -> MetricKind;
    /// Declared label names, in order.
    fn label_names(&self) -> &[&'static str];
    /// True when no label tuple has been recorded yet.
    fn is_empty(&self) -> bool;
    /// Append sample lines (no HELP/TYPE header) to `out`.
    fn render_samples(&self, out: &mut String);
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Join `name="value"` pairs, without surrounding braces.
fn label_pairs(names: &[&'static str], values: &[String]) -> String {
    let mut s = String::new();
    for (i, (k, v)) in names.iter().zip(values).enumerate() {
        if i > 0 {
            s.push(',');
        }
        let _ = write!(s, "{}=\"{}\"", k, escape_label(v));
    }
    s
}

/// Float formatting used for `le` bounds and sums.
fn fmt_float(v: f64) -> String {
    if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v}")
    }
}
