use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context(format!("Failed to read entry in {:?}", path))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let raw_type = entry
                .file_type()
                .context(format!("Failed to get file type for {:?}", path))?;

            // Directory links are never followed, which keeps recursion acyclic.
            let file_type = if raw_type.is_dir() {
                FileType::Directory
            } else if raw_type.is_file() || (raw_type.is_symlink() && path.is_file()) {
                FileType::File
            } else {
                FileType::Symlink
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir)
            .context(format!("Failed to create temporary file in {:?}", dir))?;
        tmp.write_all(contents.as_bytes())
            .context(format!("Failed to write temporary file for {:?}", path))?;
        tmp.as_file()
            .sync_all()
            .context(format!("Failed to flush temporary file for {:?}", path))?;

        // Temporary files are created 0600; keep the replaced file's mode.
        if let Ok(metadata) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .context(format!("Failed to copy permissions of {:?}", path))?;
        }

        tmp.persist(path)
            .map_err(|e| anyhow!("Failed to replace {:?}: {}", path, e.error))?;

        Ok(())
    }
}
