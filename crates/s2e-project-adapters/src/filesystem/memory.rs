//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use s2e_project_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ProjectResult,
};

/// In-memory filesystem for testing.
///
/// Paths are taken literally; there is no normalization of `..` and
/// symlinks are recorded but never followed.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    symlinks: HashMap<PathBuf, PathBuf>,
    executables: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn occupied(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.symlinks.contains_key(path)
    }

    fn require_parent(&self, path: &Path) -> ProjectResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(fs_error(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

fn fs_error(path: &Path, reason: &str) -> s2e_project_core::error::ProjectError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ProjectResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> ProjectResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    /// Place raw bytes at `path`, creating parent directories (testing helper).
    pub fn insert_bytes(&self, path: impl AsRef<Path>, bytes: &[u8]) -> ProjectResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write()?.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// Where the symlink at `link` points, if there is one.
    pub fn symlink_target(&self, link: &Path) -> Option<PathBuf> {
        let inner = self.inner.read().ok()?;
        inner.symlinks.get(link).cloned()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> ProjectResult<()> {
        let mut inner = self.write()?;
        if inner.occupied(path) {
            return Err(fs_error(path, "File exists"));
        }
        inner.require_parent(path)?;
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> ProjectResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(fs_error(&current, "Not a directory"));
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ProjectResult<()> {
        let mut inner = self.write()?;
        if inner.directories.contains(path) {
            return Err(fs_error(path, "Is a directory"));
        }
        inner.require_parent(path)?;
        inner.files.insert(path.to_path_buf(), content.as_bytes().to_vec());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ProjectResult<()> {
        let mut inner = self.write()?;
        if !inner.files.contains_key(path) {
            return Err(fs_error(path, "No such file"));
        }

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> ProjectResult<()> {
        let mut inner = self.write()?;
        if inner.occupied(link) {
            return Err(fs_error(link, "File exists"));
        }
        inner.require_parent(link)?;
        inner
            .symlinks
            .insert(link.to_path_buf(), original.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.occupied(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn read_header(&self, path: &Path, len: usize) -> ProjectResult<Vec<u8>> {
        let inner = self.read()?;
        let bytes = inner
            .files
            .get(path)
            .ok_or_else(|| fs_error(path, "No such file"))?;
        Ok(bytes.iter().take(len).copied().collect())
    }

    fn canonicalize(&self, path: &Path) -> ProjectResult<PathBuf> {
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(fs_error(path, "No such file or directory"))
        }
    }

    fn remove_dir_all(&self, path: &Path) -> ProjectResult<()> {
        let mut inner = self.write()?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.symlinks.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }
}
