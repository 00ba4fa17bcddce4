use std::path::{Path, PathBuf};

/// An S2E environment directory.
///
/// ```text
/// <env>/
/// ├── install/    ← engine build, shared data under install/share
/// ├── images/     ← guest images, one directory per image
/// └── projects/   ← one directory per analysis project
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    root: PathBuf,
}

impl Environment {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path inside the installation tree, e.g. `install_path(&["share", "decree-recipes"])`.
    pub fn install_path(&self, parts: &[&str]) -> PathBuf {
        parts
            .iter()
            .fold(self.root.join("install"), |path, part| path.join(part))
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }
}
