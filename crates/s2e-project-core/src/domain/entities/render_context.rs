//! Variables handed to the template renderer.
//!
//! A **Value Object**: immutable after construction, transformations
//! return a new instance (see `with_text`, `with_flag`).
//!
//! ## Variables set by project types
//!
//! | Variable | Example | Used by |
//! |----------|---------|---------|
//! | `current_time` | "2026-10-18 14:57:03" | every template header |
//! | `target` | "CROMU_00001" | bootstrap, config |
//! | `use_seeds` | `true` | bootstrap, config |
//! | `project_dir` | "/env/projects/CROMU_00001" | config |
//! | `target_lua_template` | "s2e-config.cgc.lua" | `s2e-config.lua` include |

use std::collections::BTreeMap;
use std::fmt;

/// A single context value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    Text(String),
    Flag(bool),
}

impl ContextValue {
    /// Truthiness for `{% if %}` blocks: `true` flags and non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Flag(b) => *b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            // Lua and shell templates both expect lowercase booleans.
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Context for template rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .insert(key.into(), ContextValue::Text(value.into()));
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.variables.insert(key.into(), ContextValue::Flag(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.variables.get(key)
    }

    /// Undefined variables are falsy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(ContextValue::is_truthy)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}
