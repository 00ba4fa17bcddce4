// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so services can log and return the same value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid seed file name '{name}': {reason}")]
    InvalidSeedName { name: String, reason: String },

    #[error("Unknown binary format: {0}")]
    UnknownBinaryFormat(String),

    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),

    // ========================================================================
    // Target Errors
    // ========================================================================
    #[error("Target binary not found: {path}")]
    TargetNotFound { path: String },

    #[error("Target is not a regular file: {path}")]
    TargetNotAFile { path: String },

    #[error("Unrecognized executable format in {path}")]
    UnrecognizedExecutable { path: String },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("No guest image supports the '{format}' binary format")]
    NoCompatibleImage { format: String },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Template syntax error in '{template}': {reason}")]
    TemplateSyntax { template: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { reason, .. } => vec![
                format!("Details: {reason}"),
                "Use --name to choose a different project name".into(),
            ],
            Self::TargetNotFound { path } => vec![
                format!("No file exists at {path}"),
                "Pass the path to the binary you want to analyze".into(),
            ],
            Self::TargetNotAFile { .. } => {
                vec!["The target must be an executable file, not a directory".into()]
            }
            Self::UnrecognizedExecutable { .. } => vec![
                "Supported formats: DECREE (CGC), ELF, PE".into(),
                "Check that the file is a compiled binary and not a script".into(),
            ],
            Self::NoCompatibleImage { format } => vec![
                format!("Build or download a guest image that runs {format} binaries"),
                "Try: s2e-project images to see available images".into(),
                "Or pick one explicitly with --image".into(),
            ],
            Self::TemplateSyntax { template, .. } => vec![
                format!("Template '{template}' is malformed"),
                "Check templates.local_path overrides in your configuration".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. }
            | Self::InvalidSeedName { .. }
            | Self::UnknownBinaryFormat(_)
            | Self::UnknownArchitecture(_) => ErrorCategory::Validation,
            Self::TargetNotFound { .. } => ErrorCategory::NotFound,
            Self::TargetNotAFile { .. } | Self::UnrecognizedExecutable { .. } => {
                ErrorCategory::Validation
            }
            Self::NoCompatibleImage { .. } => ErrorCategory::Compatibility,
            Self::TemplateSyntax { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
