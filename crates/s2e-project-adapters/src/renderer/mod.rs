//! Template rendering adapters.

mod jinja;

pub use jinja::JinjaRenderer;

pub(crate) use jinja::check_syntax;
