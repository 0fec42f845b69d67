use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
    /// Creation sequence; `read_dir` lists children in this order.
    pub seq: u64,
}

#[derive(Default)]
struct MockState {
    files: HashMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
    next_seq: u64,
}

/// In-memory file system.
///
/// Directory listings come back in creation order, so tests can reason
/// about "filesystem order" deterministically.
pub struct MockFileSystem {
    state: RwLock<MockState>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            state: RwLock::new(MockState::default()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut state = self.state.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut state, parent);
        }

        Self::insert(&mut state, path, Some(content.to_string()), FileType::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut state = self.state.write().unwrap();

        Self::ensure_parents(&mut state, &path);
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut state = self.state.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut state, parent);
        }

        Self::insert(&mut state, path, None, FileType::Symlink);
    }

    /// Makes `read_dir` on `path` fail, as if permissions were revoked.
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.state.write().unwrap().unreadable.insert(path);
    }

    /// Makes `write_atomic` on `path` fail.
    pub fn deny_write(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.state.write().unwrap().read_only.insert(path);
    }

    /// Removes `path` and everything beneath it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.state
            .write()
            .unwrap()
            .files
            .retain(|p, _| !p.starts_with(&path));
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize_path(path.as_ref());
        self.state
            .read()
            .unwrap()
            .files
            .get(&path)
            .and_then(|e| e.content.clone())
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn insert(state: &mut MockState, path: PathBuf, content: Option<String>, file_type: FileType) {
        let seq = match state.files.get(&path) {
            Some(existing) => existing.seq,
            None => {
                state.next_seq += 1;
                state.next_seq
            }
        };

        state.files.insert(
            path,
            MockEntry {
                content,
                file_type,
                seq,
            },
        );
    }

    fn ensure_parents(state: &mut MockState, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if !state.files.contains_key(&current) {
                Self::insert(state, current.clone(), None, FileType::Directory);
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.state
            .read()
            .unwrap()
            .files
            .get(&path)
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.state
            .read()
            .unwrap()
            .files
            .get(&path)
            .map(|e| e.file_type == FileType::File)
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let state = self.state.read().unwrap();
        let entry = state
            .files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry
            .content
            .clone()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let state = self.state.read().unwrap();

        match state.files.get(&path) {
            None => return Err(anyhow!("Directory not found: {:?}", path)),
            Some(e) if e.file_type != FileType::Directory => {
                return Err(anyhow!("Not a directory: {:?}", path))
            }
            Some(_) => {}
        }
        if state.unreadable.contains(&path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let mut children: Vec<(&PathBuf, &MockEntry)> = state
            .files
            .iter()
            .filter(|(p, _)| p.parent() == Some(path.as_path()))
            .collect();
        children.sort_by_key(|(_, e)| e.seq);

        Ok(children
            .into_iter()
            .map(|(p, e)| DirEntry {
                path: p.clone(),
                name: p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
                file_type: e.file_type,
            })
            .collect())
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let path = self.normalize_path(path);
        let mut state = self.state.write().unwrap();

        if state.read_only.contains(&path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        let parent_is_dir = path
            .parent()
            .and_then(|p| state.files.get(p))
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false);
        if !parent_is_dir {
            return Err(anyhow!("Parent directory not found: {:?}", path));
        }

        Self::insert(&mut state, path, Some(contents.to_string()), FileType::File);
        Ok(())
    }
}
