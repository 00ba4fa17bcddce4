//! Application layer for s2e-project.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProjectService, ImageService)
//! - **Project types**: Per-target hooks that populate a project directory
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Rules about what a
//! valid target or project name is live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod project_types;
pub mod services;

// Re-export main services
pub use services::{CreateRequest, ImageService, ProjectPlan, ProjectService, ProjectSummary};

// Re-export project types
pub use project_types::{CgcProject, ProjectContext, ProjectType};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ImageCatalog, TemplateRenderer};

pub use error::ApplicationError;
