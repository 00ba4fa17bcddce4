use std::path::{Path, PathBuf};

/// Bootstrap script launched inside the guest.
pub const BOOTSTRAP_SCRIPT: &str = "bootstrap.sh";
/// Seed inputs consumed by the seed searcher.
pub const SEEDS_DIR: &str = "seeds";
/// Symlink to the shared recipe repository.
pub const RECIPES_LINK: &str = "recipes";
/// Machine-readable project description.
pub const PROJECT_DESCRIPTOR: &str = "project.json";
/// Engine configuration files rendered into every project, in render order.
pub const CONFIG_FILES: [&str; 3] = ["s2e-config.lua", "models.lua", "library.lua"];

/// Paths of the files and directories that make up a project.
///
/// Pure path arithmetic; nothing here touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    pub fn bootstrap(&self) -> PathBuf {
        self.join(BOOTSTRAP_SCRIPT)
    }

    pub fn seeds_dir(&self) -> PathBuf {
        self.join(SEEDS_DIR)
    }

    pub fn recipes_link(&self) -> PathBuf {
        self.join(RECIPES_LINK)
    }

    pub fn descriptor(&self) -> PathBuf {
        self.join(PROJECT_DESCRIPTOR)
    }

    pub fn config_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        CONFIG_FILES.iter().map(|f| self.join(f))
    }

    /// Every entry a fully created project contains, for dry-run listings.
    pub fn entries(&self) -> Vec<PathBuf> {
        let mut entries = vec![self.seeds_dir(), self.recipes_link(), self.bootstrap()];
        entries.extend(self.config_files());
        entries.push(self.descriptor());
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_root() {
        let layout = ProjectLayout::new("/env/projects/CADET_00001");
        assert_eq!(layout.bootstrap(), PathBuf::from("/env/projects/CADET_00001/bootstrap.sh"));
        assert_eq!(layout.seeds_dir(), PathBuf::from("/env/projects/CADET_00001/seeds"));
        assert_eq!(layout.recipes_link(), PathBuf::from("/env/projects/CADET_00001/recipes"));
        assert!(layout.entries().iter().all(|p| p.starts_with(layout.root())));
    }

    #[test]
    fn config_files_in_order() {
        let layout = ProjectLayout::new("p");
        let names: Vec<_> = layout
            .config_files()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["s2e-config.lua", "models.lua", "library.lua"]);
    }
}
