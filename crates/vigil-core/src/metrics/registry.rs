use std::fmt::Write;
use std::sync::Arc;

use crate::error::{Result, VigilError};

use super::Collector;

/// Owns every registered instrument and renders them for scraping.
///
/// Registration needs `&mut self` and happens once at startup; afterwards the
/// registry is shared behind an `Arc` and only read. Recording goes through
/// the instruments themselves, which are internally synchronized.
#[derive(Default)]
pub struct MetricRegistry {
    collectors: Vec<Arc<dyn Collector>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instrument. Duplicate or malformed names are configuration
    /// errors and must abort startup.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<()> {
        let name = collector.name();
        if !is_valid_metric_name(name) {
            return Err(VigilError::InvalidMetric(format!("metric name {name:?}")));
        }
        if let Some(bad) = collector.label_names().iter().find(|l| !is_valid_label_name(l)) {
            return Err(VigilError::InvalidMetric(format!("{name}: label name {bad:?}")));
        }
        if self.collectors.iter().any(|c| c.name() == name) {
            return Err(VigilError::DuplicateMetric(name.to_string()));
        }

        tracing::debug!(metric = name, kind = collector.kind().as_str(), "metric registered");
        self.collectors.push(collector);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.collectors.iter().any(|c| c.name() == name)
    }

    /// Render every instrument that has at least one sample, in registration
    /// order, in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for c in &self.collectors {
            if c.is_empty() {
                continue;
            }
            let help = c.help().replace('\\', "\\\\").replace('\n', "\\n");
            let _ = writeln!(out, "# HELP {} {}", c.name(), help);
            let _ = writeln!(out, "# TYPE {} {}", c.name(), c.kind().as_str());
            c.render_samples(&mut out);
        }
        out
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    // `le` is reserved for histogram bucket bounds.
    name != "le" && !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
