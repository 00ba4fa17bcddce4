//! Template storage.

mod memory;

pub use memory::TemplateLibrary;
