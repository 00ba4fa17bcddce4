//! Image Service - guest image queries.
//!
//! Handles image lookup and selection. Separated from `ProjectService` for
//! single responsibility; the CLI also uses it to list images.

use tracing::debug;

use crate::{
    application::ports::ImageCatalog,
    domain::{BinaryFormat, DomainError, ImageDescriptor},
    error::ProjectResult,
};

/// Service for guest image operations.
pub struct ImageService {
    catalog: Box<dyn ImageCatalog>,
}

impl ImageService {
    /// Create a new image service.
    pub fn new(catalog: Box<dyn ImageCatalog>) -> Self {
        Self { catalog }
    }

    /// Get an image by name.
    pub fn get(&self, name: &str) -> ProjectResult<ImageDescriptor> {
        self.catalog.get(name)
    }

    /// List all images.
    pub fn list(&self) -> ProjectResult<Vec<ImageDescriptor>> {
        self.catalog.list()
    }

    /// First image (by name) whose guest declares `format`.
    pub fn find_compatible(&self, format: BinaryFormat) -> ProjectResult<ImageDescriptor> {
        let image = self
            .catalog
            .list()?
            .into_iter()
            .find(|image| image.os.supports(format))
            .ok_or_else(|| DomainError::NoCompatibleImage {
                format: format.to_string(),
            })?;

        debug!(image = %image.name, %format, "Selected compatible image");
        Ok(image)
    }

    /// The named image if given, otherwise the first compatible one.
    pub fn resolve(&self, name: Option<&str>, format: BinaryFormat) -> ProjectResult<ImageDescriptor> {
        match name {
            Some(name) => self.get(name),
            None => self.find_compatible(format),
        }
    }
}
