//! Infrastructure adapters for s2e-project.
//!
//! This crate implements the ports defined in
//! `s2e_project_core::application::ports`. It contains all file I/O, the
//! Jinja template rendering and the image catalog.

pub mod builtin_templates;
pub mod filesystem;
pub mod images;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use images::DirectoryImageCatalog;
pub use renderer::JinjaRenderer;
pub use template_store::TemplateLibrary;
