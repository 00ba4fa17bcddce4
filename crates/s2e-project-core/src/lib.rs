//! s2e-project core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for creating S2E
//! analysis projects, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         s2e-project-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ProjectService, ImageService)       │
//! │  + Project types (CgcProject, ...)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, Renderer, ImageCatalog)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   s2e-project-adapters (Infrastructure) │
//! │ (LocalFilesystem, JinjaRenderer, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Target, ProjectLayout, SeedFile, ...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use s2e_project_core::prelude::*;
//!
//! // Adapters come from s2e-project-adapters
//! let service = ProjectService::new(filesystem, renderer, images, Environment::new(env_dir));
//!
//! let request = CreateRequest::new("/bins/CADET_00001").with_image("cgc_debian-9.2.1-i386");
//! let summary = service.create(&CgcProject, &request)?;
//! println!("{}", summary.instructions);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CgcProject, CreateRequest, ImageService, ProjectService, ProjectSummary, ProjectType,
        ports::{Filesystem, ImageCatalog, TemplateRenderer},
    };
    pub use crate::domain::{
        Arch, BinaryFormat, Environment, ImageDescriptor, Instructions, OsInfo, ProjectLayout,
        RenderContext, SeedFile, Target,
    };
    pub use crate::error::{ProjectError, ProjectResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
