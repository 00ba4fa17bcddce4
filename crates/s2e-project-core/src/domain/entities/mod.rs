pub mod environment;
pub mod instructions;
pub mod project_layout;
pub mod render_context;
pub mod seed;
pub mod target;

pub use crate::domain::DomainError;
pub use environment::Environment;
pub use instructions::Instructions;
pub use project_layout::ProjectLayout;
pub use render_context::{ContextValue, RenderContext};
pub use seed::SeedFile;
pub use target::{ImageDescriptor, OsInfo, Target};
