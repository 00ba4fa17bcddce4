//! Guest image catalog backed by `<env>/images`.
//!
//! Each image lives in its own directory with an `image.json` descriptor:
//!
//! ```json
//! {
//!   "name": "cgc_debian-9.2.1-i386",
//!   "os": { "name": "cgc", "arch": "i386", "binary_formats": ["decree"] }
//! }
//! ```
//!
//! `name` may be omitted, in which case the directory name is used.

use std::{
    fs,
    path::{Path, PathBuf},
};

use s2e_project_core::{
    application::{ApplicationError, ports::ImageCatalog},
    domain::{Environment, ImageDescriptor},
    error::ProjectResult,
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

/// File name of an image descriptor.
pub const IMAGE_DESCRIPTOR: &str = "image.json";

/// Reads image descriptors from a directory of images.
#[derive(Debug, Clone)]
pub struct DirectoryImageCatalog {
    images_dir: PathBuf,
}

impl DirectoryImageCatalog {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Catalog of `<env>/images`.
    pub fn for_environment(environment: &Environment) -> Self {
        Self::new(environment.images_dir())
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    fn load(&self, dir_name: &str, descriptor: &Path) -> ProjectResult<ImageDescriptor> {
        let raw = fs::read_to_string(descriptor).map_err(|e| ApplicationError::FilesystemError {
            path: descriptor.to_path_buf(),
            reason: format!("Failed to read image descriptor: {e}"),
        })?;

        let mut image: ImageDescriptor =
            serde_json::from_str(&raw).map_err(|e| ApplicationError::InvalidImage {
                path: descriptor.to_path_buf(),
                reason: e.to_string(),
            })?;

        if image.name.is_empty() {
            image.name = dir_name.to_string();
        }
        Ok(image)
    }
}

impl ImageCatalog for DirectoryImageCatalog {
    #[instrument(skip(self))]
    fn get(&self, name: &str) -> ProjectResult<ImageDescriptor> {
        let not_found = || ApplicationError::ImageNotFound {
            name: name.to_string(),
        };

        // Image names are single directory names
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(not_found().into());
        }

        let descriptor = self.images_dir.join(name).join(IMAGE_DESCRIPTOR);
        if !descriptor.is_file() {
            return Err(not_found().into());
        }

        self.load(name, &descriptor)
    }

    #[instrument(skip(self), fields(dir = %self.images_dir.display()))]
    fn list(&self) -> ProjectResult<Vec<ImageDescriptor>> {
        if !self.images_dir.is_dir() {
            debug!("No images directory");
            return Ok(Vec::new());
        }

        let mut images = Vec::new();
        let entries = WalkDir::new(&self.images_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.images_dir.clone(),
                reason: format!("Failed to read images directory: {e}"),
            })?;

            let descriptor = entry.path().join(IMAGE_DESCRIPTOR);
            if !entry.file_type().is_dir() || !descriptor.is_file() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy();
            match self.load(&dir_name, &descriptor) {
                Ok(image) => images.push(image),
                Err(e) => warn!(image = %dir_name, error = %e, "Skipping image"),
            }
        }

        debug!(count = images.len(), "Listed images");
        Ok(images)
    }
}
