//! Output formatting for build results
//!
//! JSON and YAML are meant for the lifecycle side to consume. The human
//! format is a short summary for people running the tool by hand.

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::buildpack::BuildResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable summary
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &BuildResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(result),
            OutputFormat::Yaml => self.format_yaml(result),
            OutputFormat::Human => Ok(self.format_human(result)),
        }
    }

    fn format_json(&self, result: &BuildResult) -> Result<String> {
        serde_json::to_string_pretty(result).context("Failed to serialize build result to JSON")
    }

    fn format_yaml(&self, result: &BuildResult) -> Result<String> {
        serde_yaml::to_string(result).context("Failed to serialize build result to YAML")
    }

    fn format_human(&self, result: &BuildResult) -> String {
        if result.is_empty() {
            return "Not a Spring Boot application, nothing to contribute\n".to_string();
        }

        let mut output = String::new();

        let _ = writeln!(output, "Labels:");
        for label in &result.labels {
            let _ = writeln!(output, "  {} = {}", label.key, truncate(&label.value, 72));
        }

        let _ = writeln!(output, "\nLayers:");
        if result.layers.is_empty() {
            let _ = writeln!(output, "  (none)");
        }
        for layer in &result.layers {
            match layer.helper_names() {
                Some(names) => {
                    let _ = writeln!(output, "  {} [{}]", layer.name(), names.join(", "));
                }
                None => {
                    let _ = writeln!(output, "  {}", layer.name());
                }
            }
        }

        let _ = writeln!(output, "\nBill of Materials:");
        for entry in &result.bom {
            let _ = writeln!(output, "  {}", entry.name);
        }

        if !result.slices.is_empty() {
            let _ = writeln!(output, "\nSlices:");
            for (i, slice) in result.slices.iter().enumerate() {
                let _ = writeln!(output, "  {}: {}", i + 1, slice.paths.join(", "));
            }
        }

        output
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}
