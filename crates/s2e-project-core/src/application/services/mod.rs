//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a project" or "pick an image".

pub mod image_service;
pub mod project_service;

pub use image_service::ImageService;
pub use project_service::{CreateRequest, ProjectPlan, ProjectService, ProjectSummary};
