use super::manifest::{render_manifest, ManifestReport, ManifestStatus};
use super::partial::{discover_partials, Partial};
use super::{AggregateError, AggregatorConfig};
use crate::fs::{FileSystem, RealFileSystem};
use glob::{glob_with, MatchOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of one batch run over a glob pattern.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub pattern: String,
    pub manifests: Vec<ManifestReport>,
    pub elapsed_ms: u64,
}

impl AggregateReport {
    pub fn empty(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            manifests: Vec::new(),
            elapsed_ms: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn count(&self, status: ManifestStatus) -> usize {
        self.manifests.iter().filter(|m| m.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.manifests.iter().any(ManifestReport::is_failed)
    }

    pub fn has_stale(&self) -> bool {
        self.count(ManifestStatus::Stale) > 0
    }
}

/// Discovers partials and regenerates manifests.
///
/// Cloning is cheap: the file system is shared and the config is small,
/// which lets every manifest in a batch run on its own blocking task.
#[derive(Clone)]
pub struct Aggregator {
    fs: Arc<dyn FileSystem>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()), config)
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>, config: AggregatorConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn discover_partials(&self, root: &Path) -> Result<Vec<Partial>, AggregateError> {
        discover_partials(self.fs.as_ref(), root, &self.config)
    }

    /// Rewrites one manifest from the partials beneath its directory.
    ///
    /// The new contents are rendered in memory and written with a single
    /// atomic replace, so a failure leaves the previous manifest intact.
    pub fn regenerate_manifest(&self, manifest: &Path) -> Result<ManifestReport, AggregateError> {
        if !self.fs.is_file(manifest) {
            return Err(AggregateError::ManifestNotFound(manifest.to_path_buf()));
        }

        let root = match manifest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut partials = self.discover_partials(root)?;
        if let Some(own_name) = manifest.file_name() {
            partials.retain(|p| p.relative_path.as_os_str() != own_name);
        }
        let rendered = render_manifest(&partials, &self.config);

        let previous = match self.fs.read_to_string(manifest) {
            Ok(contents) => Some(contents),
            Err(e) => {
                debug!(
                    manifest = %manifest.display(),
                    error = %e,
                    "Could not read previous manifest"
                );
                None
            }
        };
        let changed = previous.as_deref() != Some(rendered.as_str());

        let status = if self.config.dry_run {
            if changed {
                ManifestStatus::Stale
            } else {
                ManifestStatus::Unchanged
            }
        } else {
            self.fs
                .write_atomic(manifest, &rendered)
                .map_err(|e| AggregateError::filesystem(manifest, e))?;
            if changed {
                ManifestStatus::Written
            } else {
                ManifestStatus::Unchanged
            }
        };

        debug!(
            manifest = %manifest.display(),
            imports = partials.len(),
            status = %status,
            "Manifest regenerated"
        );

        Ok(ManifestReport::new(
            manifest.to_path_buf(),
            status,
            partials.len(),
        ))
    }

    /// Lists existing manifest files matching `pattern`, sorted by path.
    ///
    /// Matches whose file name is not the configured manifest name are
    /// skipped, so a loose pattern can never select a partial for
    /// overwriting. Returns `PatternMatch` when nothing is left.
    pub fn find_manifests(&self, pattern: &str) -> Result<Vec<PathBuf>, AggregateError> {
        let paths =
            glob_with(pattern, MATCH_OPTIONS).map_err(|e| AggregateError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        let mut found = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(
                        path = %e.path().display(),
                        error = %e.error(),
                        "Skipping unreadable path during manifest search"
                    );
                    continue;
                }
            };

            if !self.fs.is_file(&path) {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str());
            if name != Some(self.config.manifest_name.as_str()) {
                warn!(
                    path = %path.display(),
                    manifest_name = %self.config.manifest_name,
                    "Ignoring match that is not a manifest file"
                );
                continue;
            }
            found.push(path);
        }

        if found.is_empty() {
            return Err(AggregateError::PatternMatch(pattern.to_string()));
        }

        found.sort();
        debug!(pattern, manifests = found.len(), "Manifest search completed");
        Ok(found)
    }

    /// Regenerates one manifest, logging and recording any failure instead
    /// of returning it.
    pub fn regenerate_isolated(&self, manifest: PathBuf) -> ManifestReport {
        match self.regenerate_manifest(&manifest) {
            Ok(report) => report,
            Err(e) => {
                error!(
                    manifest = %manifest.display(),
                    error = %e,
                    "Failed to regenerate manifest"
                );
                ManifestReport::failed(manifest, &e)
            }
        }
    }

    /// Regenerates the given manifests concurrently, one blocking task
    /// each. Reports come back in the order the manifests were given.
    pub async fn regenerate_all(&self, manifests: Vec<PathBuf>) -> Vec<ManifestReport> {
        let handles: Vec<_> = manifests
            .into_iter()
            .map(|manifest| {
                let aggregator = self.clone();
                let path = manifest.clone();
                let handle =
                    tokio::task::spawn_blocking(move || aggregator.regenerate_isolated(manifest));
                (path, handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(manifest = %path.display(), error = %e, "Manifest task panicked");
                    reports.push(ManifestReport::failed(path, format!("task panicked: {}", e)));
                }
            }
        }
        reports
    }

    /// Regenerates every manifest matching `pattern`.
    ///
    /// Manifests are processed concurrently and independently: a failure is
    /// logged and recorded in the report without affecting the others. A
    /// pattern that matches nothing is a logged no-op.
    pub async fn aggregate_all(&self, pattern: &str) -> Result<AggregateReport, AggregateError> {
        let start = Instant::now();

        info!(
            pattern,
            ordering = %self.config.ordering,
            dry_run = self.config.dry_run,
            "Starting partial aggregation"
        );

        let manifests = match self.find_manifests(pattern) {
            Ok(manifests) => manifests,
            Err(AggregateError::PatternMatch(p)) => {
                warn!(pattern = %p, "No manifest files matched, nothing to do");
                return Ok(AggregateReport::empty(pattern));
            }
            Err(e) => return Err(e),
        };

        let report = AggregateReport {
            pattern: pattern.to_string(),
            manifests: self.regenerate_all(manifests).await,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            manifests = report.manifests.len(),
            written = report.count(ManifestStatus::Written),
            unchanged = report.count(ManifestStatus::Unchanged),
            stale = report.count(ManifestStatus::Stale),
            failed = report.count(ManifestStatus::Failed),
            elapsed_ms = report.elapsed_ms,
            "Partial aggregation completed"
        );

        Ok(report)
    }
}
