// src/endpoint/render.rs
use crate::health::{AggregateReport, HealthStatus};
use std::fmt::Write as _;

/// Pluggable body formatting for probe responses. The host picks one per
/// endpoint; the default is human-readable text.
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn render(&self, report: &AggregateReport) -> String;
}

/// Plain-text summary: overall line, then one line per entry.
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render(&self, report: &AggregateReport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({} checks, {}ms)",
            report.status,
            report.entries.len(),
            report.total_duration.as_millis()
        );
        for entry in &report.entries {
            let _ = write!(out, "{}: {}", entry.name, entry.result.status);
            if let Some(description) = &entry.result.description {
                let _ = write!(out, " - {description}");
            }
            if entry.result.status != HealthStatus::Healthy {
                if let Some(error) = &entry.result.error {
                    let _ = write!(out, " ({error})");
                }
            }
            let _ = writeln!(out);
        }
        out
    }
}

/// Structured summary over the serde representation of the report.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, report: &AggregateReport) -> String {
        // AggregateReport serialization cannot fail; fall back to a minimal
        // body rather than panicking in the response path.
        serde_json::to_string(report)
            .unwrap_or_else(|_| format!(r#"{{"status":"{}"}}"#, report.status))
    }
}
