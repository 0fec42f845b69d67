//! Partial aggregation
//!
//! Finds manifest files (`__all.scss` by default), discovers every partial
//! beneath each manifest's directory and rewrites the manifest as a list of
//! `@import` declarations behind a warning banner.
//!
//! - [`partial`]: partial discovery and import identifier derivation
//! - [`manifest`]: manifest rendering and per-manifest outcomes
//! - [`service`]: the [`Aggregator`] tying discovery, rendering and batch runs together

pub mod error;
pub mod manifest;
pub mod partial;
pub mod service;

pub use error::AggregateError;
pub use manifest::{banner, render_manifest, ManifestReport, ManifestStatus};
pub use partial::{import_identifier, Partial};
pub use service::{AggregateReport, Aggregator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MARKER: char = '_';
pub const DEFAULT_EXTENSION: &str = ".scss";
pub const DEFAULT_MANIFEST_NAME: &str = "__all.scss";

/// Order in which discovered partials are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialOrdering {
    /// Relative paths compared component by component. Stable across
    /// platforms and runs.
    #[default]
    Sorted,
    /// Whatever order the file system enumerates directory entries in.
    /// Not guaranteed to be stable between machines.
    Filesystem,
}

impl FromStr for PartialOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sorted" => Ok(PartialOrdering::Sorted),
            "filesystem" | "fs" => Ok(PartialOrdering::Filesystem),
            other => Err(format!(
                "Invalid ordering: {}. Valid options: sorted, filesystem",
                other
            )),
        }
    }
}

impl fmt::Display for PartialOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialOrdering::Sorted => write!(f, "sorted"),
            PartialOrdering::Filesystem => write!(f, "filesystem"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// First character of every partial's file name
    pub marker: char,
    /// Recognised partial extension, including the leading dot
    pub extension: String,
    /// File name of the generated manifest; never imported
    pub manifest_name: String,
    pub ordering: PartialOrdering,
    /// Render and compare only, leave manifests untouched
    pub dry_run: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            extension: DEFAULT_EXTENSION.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            ordering: PartialOrdering::default(),
            dry_run: false,
        }
    }
}
