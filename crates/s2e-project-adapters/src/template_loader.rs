//! Filesystem-based template loader.
//!
//! Reads every file under an override directory. A file's template name is
//! its path relative to that directory, with forward slashes, so
//! `models.lua` at the top level shadows the built-in `models.lua`:
//!
//! ```text
//! templates/
//! ├── models.lua            ← shadows the built-in
//! └── layers/
//!     └── extra.lua         ← available as "layers/extra.lua"
//! ```
//!
//! Hidden files and directories are ignored.

use std::{
    fs,
    path::{Path, PathBuf},
};

use s2e_project_core::{application::ApplicationError, error::ProjectResult};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// Loads templates from a directory tree.
pub struct OverrideLoader {
    dir: PathBuf,
}

impl OverrideLoader {
    /// Create a loader pointed at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read every template under the directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::FilesystemError`] if the directory does
    /// not exist or cannot be walked. Files that are not valid UTF-8 are
    /// skipped with a `WARN` log.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn load_all(&self) -> ProjectResult<Vec<(String, String)>> {
        if !self.dir.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.dir.clone(),
                reason: "Template directory not found".into(),
            }
            .into());
        }

        let mut templates = Vec::new();
        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().map_or_else(|| self.dir.clone(), Path::to_path_buf),
                reason: format!("Failed to walk template directory: {e}"),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = template_name(&self.dir, entry.path());
            match fs::read_to_string(entry.path()) {
                Ok(source) => {
                    debug!(template = %name, "Read template");
                    templates.push((name, source));
                }
                Err(e) => {
                    // One unreadable file must not block the others.
                    warn!(path = %entry.path().display(), error = %e, "Skipping template");
                }
            }
        }

        Ok(templates)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    // The root itself may be hidden (e.g. a temp dir)
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
