// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for s2e-project.
//!
//! This module contains pure logic: what a target is, what a project looks
//! like on disk, how seeds are named, how instructions are composed. All
//! I/O and template rendering are reached through ports defined in the
//! application layer.
//!
//! ## Rules
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem or process calls
//! - **Immutable values**: All domain objects are Clone + PartialEq

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    ContextValue, Environment, ImageDescriptor, Instructions, OsInfo, ProjectLayout,
    RenderContext, SeedFile, Target,
    project_layout::{
        BOOTSTRAP_SCRIPT, CONFIG_FILES, PROJECT_DESCRIPTOR, RECIPES_LINK, SEEDS_DIR,
    },
    seed::SEED_NAME_PATTERN,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{Arch, BinaryFormat, HEADER_LEN, SeedPolicy};

pub use validation::DomainValidator;
