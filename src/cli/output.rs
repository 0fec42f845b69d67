//! Output formatting for multiple formats
//!
//! Formatters for aggregation reports, partial listings and configuration
//! in JSON, YAML and human-readable text.
//!
//! # Example
//!
//! ```ignore
//! use partialgen::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_report(&report)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::aggregator::{AggregateReport, ManifestStatus, Partial};
use crate::config::PartialgenConfig;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Partials discovered under one scan root, as printed by `list`
#[derive(Debug, Clone, Serialize)]
pub struct PartialListing {
    pub root: PathBuf,
    pub partials: Vec<Partial>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &AggregateReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize aggregation report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(report)
                .context("Failed to serialize aggregation report to YAML"),
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    pub fn format_listing(&self, listing: &PartialListing) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(listing)
                .context("Failed to serialize partial listing to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(listing)
                .context("Failed to serialize partial listing to YAML"),
            OutputFormat::Human => Ok(self.format_listing_human(listing)),
        }
    }

    pub fn format_config(&self, config: &PartialgenConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_report_human(&self, report: &AggregateReport) -> String {
        let mut output = String::new();

        if report.has_failures() {
            output.push_str("\u{2717} Manifest Aggregation (with failures)\n");
        } else if report.has_stale() {
            output.push_str("\u{26A0} Manifest Aggregation (out of date)\n");
        } else {
            output.push_str("\u{2713} Manifest Aggregation\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Pattern:  {}\n", report.pattern));

        if report.is_empty() {
            output.push_str("No manifest files matched.\n");
            return output;
        }
        output.push('\n');

        output.push_str("Manifests:\n");
        for (i, manifest) in report.manifests.iter().enumerate() {
            let is_last = i == report.manifests.len() - 1;
            let connector = if is_last { "\u{2514}" } else { "\u{251C}" };
            let symbol = match manifest.status {
                ManifestStatus::Written => "\u{2713}",
                ManifestStatus::Unchanged => "=",
                ManifestStatus::Stale => "\u{26A0}",
                ManifestStatus::Failed => "\u{2717}",
            };

            output.push_str(&format!(
                "{}\u{2500} {} {} ({}, {} imports)\n",
                connector,
                symbol,
                manifest.manifest.display(),
                manifest.status,
                manifest.imports
            ));
            if let Some(ref error) = manifest.error {
                let indent = if is_last { " " } else { "\u{2502}" };
                output.push_str(&format!("{}    {}\n", indent, error));
            }
        }
        output.push('\n');

        output.push_str(&format!(
            "Summary:  {} written, {} unchanged, {} stale, {} failed in {}ms\n",
            report.count(ManifestStatus::Written),
            report.count(ManifestStatus::Unchanged),
            report.count(ManifestStatus::Stale),
            report.count(ManifestStatus::Failed),
            report.elapsed_ms
        ));

        output
    }

    fn format_listing_human(&self, listing: &PartialListing) -> String {
        let mut output = String::new();

        output.push_str(&format!("Partials in {}\n", listing.root.display()));
        output.push_str(RULE);
        output.push_str("\n\n");

        if listing.partials.is_empty() {
            output.push_str("(no partials found)\n");
            return output;
        }

        let width = listing
            .partials
            .iter()
            .map(|p| p.relative_path.display().to_string().len())
            .max()
            .unwrap_or(0);

        for partial in &listing.partials {
            output.push_str(&format!(
                "{:<width$}  \u{2192}  {}\n",
                partial.relative_path.display().to_string(),
                partial.identifier,
                width = width
            ));
        }

        output.push_str(&format!("\n{} partial(s)\n", listing.partials.len()));
        output
    }
}
