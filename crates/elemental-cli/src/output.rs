//! Output formatting utilities

use elemental_core::{Element, Path};
use elemental_search::SearchReport;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

pub fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Numbered step listing for one path
pub fn format_path(index: usize, path: &Path) -> String {
    let mut out = format!("Path {} ({} steps):\n", index + 1, path.len());
    for (i, step) in path.iter().enumerate() {
        out.push_str(&format!(
            "  Step {}: {} + {} -> {}\n",
            i + 1,
            step.first,
            step.second,
            step.result
        ));
    }
    out
}

pub fn format_report(report: &SearchReport) -> String {
    let mut out = format!("Target: {}\n", report.target);
    out.push_str(&format!("Paths found: {}\n", report.paths.len()));
    out.push_str(&format!("Visited nodes: {}\n", report.visited));
    out.push_str(&format!("Elapsed: {} ms\n", report.elapsed_ms));

    if report.paths.is_empty() {
        return out;
    }
    for (i, path) in report.paths.iter().enumerate() {
        out.push('\n');
        out.push_str(&format_path(i, path));
    }
    out
}

pub fn format_elements(elements: &[&Element]) -> String {
    let width = elements.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for element in elements {
        let tier = if element.is_basic {
            "Starting"
        } else if element.tier.is_empty() {
            "-"
        } else {
            element.tier.as_str()
        };
        out.push_str(&format!(
            "{:<width$}  {:<24}  {} recipes\n",
            element.name,
            tier,
            element.recipes.len(),
            width = width
        ));
    }
    out
}
