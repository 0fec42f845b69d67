use super::{AggregatorConfig, Partial};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

const GENERATED_NOTICE: &str =
    "// It is automatically generated by partialgen. Do not directly modify this file.";

/// Warning written at the top of every generated manifest, describing the
/// partials it collects.
pub fn banner(config: &AggregatorConfig) -> String {
    let prefix = match config.marker {
        '_' => "underscore-prefixed".to_string(),
        marker => format!("'{}'-prefixed", marker),
    };

    format!(
        "// This file imports all other {} {} files in this directory and sub-directories.\n{}\n\n",
        prefix, config.extension, GENERATED_NOTICE
    )
}

/// Renders the complete manifest text: banner, blank line, one import per
/// partial in the given order.
pub fn render_manifest(partials: &[Partial], config: &AggregatorConfig) -> String {
    let mut out = banner(config);

    for partial in partials {
        out.push_str(&format!("@import \"{}\";\n", partial.identifier));
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestStatus {
    /// Rewritten with different contents
    Written,
    /// Rewritten (or, in a dry run, checked) with identical contents
    Unchanged,
    /// Dry run only: on-disk contents differ from the rendered manifest
    Stale,
    Failed,
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManifestStatus::Written => "written",
            ManifestStatus::Unchanged => "unchanged",
            ManifestStatus::Stale => "stale",
            ManifestStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of regenerating one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestReport {
    pub manifest: PathBuf,
    pub status: ManifestStatus,
    pub imports: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManifestReport {
    pub fn new(manifest: PathBuf, status: ManifestStatus, imports: usize) -> Self {
        Self {
            manifest,
            status,
            imports,
            error: None,
        }
    }

    pub fn failed(manifest: PathBuf, error: impl fmt::Display) -> Self {
        Self {
            manifest,
            status: ManifestStatus::Failed,
            imports: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ManifestStatus::Failed
    }
}
