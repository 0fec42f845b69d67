use super::{AggregateError, AggregatorConfig, PartialOrdering};
use crate::fs::FileSystem;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// A partial discovered beneath a scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partial {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Name used in the `@import` declaration
    pub identifier: String,
}

impl Partial {
    pub fn new(relative_path: PathBuf, config: &AggregatorConfig) -> Self {
        let identifier = import_identifier(&relative_path, config.marker, &config.extension);
        Self {
            relative_path,
            identifier,
        }
    }
}

/// Derives the import identifier for a partial.
///
/// The marker is stripped from the file name only (directory names keep
/// theirs), the extension is dropped and components are joined with `/`
/// on every platform.
pub fn import_identifier(relative_path: &Path, marker: char, extension: &str) -> String {
    let mut parts: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if let Some(name) = parts.pop() {
        let stem = name.strip_prefix(marker).unwrap_or(&name);
        let stem = stem.strip_suffix(extension).unwrap_or(stem);
        parts.push(stem.to_string());
    }

    parts.join("/")
}

pub(crate) fn is_partial_name(name: &str, config: &AggregatorConfig) -> bool {
    name != config.manifest_name
        && name.starts_with(config.marker)
        && name.ends_with(config.extension.as_str())
        && name.len() > config.extension.len() + config.marker.len_utf8()
}

/// Recursively collects partials beneath `root`.
///
/// Any unreadable directory fails the whole discovery; callers decide
/// whether that is fatal.
pub fn discover_partials(
    fs: &dyn FileSystem,
    root: &Path,
    config: &AggregatorConfig,
) -> Result<Vec<Partial>, AggregateError> {
    let relative = walk(fs, root, Path::new(""), config)?;

    let mut partials: Vec<Partial> = relative
        .into_iter()
        .map(|path| Partial::new(path, config))
        .collect();

    if config.ordering == PartialOrdering::Sorted {
        partials.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    }

    debug!(
        root = %root.display(),
        partials = partials.len(),
        ordering = %config.ordering,
        "Partial discovery completed"
    );

    Ok(partials)
}

fn walk(
    fs: &dyn FileSystem,
    dir: &Path,
    relative_dir: &Path,
    config: &AggregatorConfig,
) -> Result<Vec<PathBuf>, AggregateError> {
    let entries = fs
        .read_dir(dir)
        .map_err(|e| AggregateError::filesystem(dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let relative = relative_dir.join(entry.file_name());

        if entry.is_dir() {
            found.extend(walk(fs, entry.path(), &relative, config)?);
        } else if entry.is_file() && is_partial_name(entry.file_name(), config) {
            trace!(partial = %relative.display(), "Found partial");
            found.push(relative);
        }
    }

    Ok(found)
}
