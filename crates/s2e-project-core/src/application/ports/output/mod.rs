//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `s2e-project-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{ImageDescriptor, RenderContext};
use crate::error::ProjectResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `s2e_project_adapters::filesystem::LocalFilesystem` (production)
/// - `s2e_project_adapters::filesystem::MemoryFilesystem` (testing)
///
/// `create_dir` and `symlink` must fail when the path already exists; project
/// creation relies on that to never overwrite an existing project.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a single directory. Fails if it exists or the parent is missing.
    fn create_dir(&self, path: &Path) -> ProjectResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ProjectResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ProjectResult<()>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> ProjectResult<()>;

    /// Create `link` pointing at `original`. Fails if `link` exists.
    fn symlink(&self, original: &Path, link: &Path) -> ProjectResult<()>;

    /// Check if path exists (symlinks count even when dangling).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read up to `len` bytes from the start of a file.
    fn read_header(&self, path: &Path, len: usize) -> ProjectResult<Vec<u8>>;

    /// Resolve a path to its absolute, symlink-free form.
    fn canonicalize(&self, path: &Path) -> ProjectResult<PathBuf>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ProjectResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `s2e_project_adapters::renderer::JinjaRenderer` (built-in templates
///   with optional on-disk overrides)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the template called `template` with `context`.
    fn render(&self, template: &str, context: &RenderContext) -> ProjectResult<String>;
}

/// Port for guest image lookup.
///
/// Implemented by:
/// - `s2e_project_adapters::images::DirectoryImageCatalog` (`<env>/images`)
#[cfg_attr(test, mockall::automock)]
pub trait ImageCatalog: Send + Sync {
    /// Get an image by its name.
    fn get(&self, name: &str) -> ProjectResult<ImageDescriptor>;

    /// List all images, sorted by name.
    fn list(&self) -> ProjectResult<Vec<ImageDescriptor>>;
}
