//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core calls and render the
//! results through [`crate::output::OutputManager`].

pub mod completions;
pub mod config;
pub mod images;
pub mod init;
pub mod new;

use std::path::PathBuf;

use tracing::debug;

use s2e_project_adapters::DirectoryImageCatalog;
use s2e_project_core::domain::Environment;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Resolve and check the S2E environment for this invocation.
pub(crate) fn environment(global: &GlobalArgs, config: &AppConfig) -> CliResult<Environment> {
    let root: PathBuf = config.env_dir(global)?;
    if !root.is_dir() {
        return Err(CliError::EnvironmentNotFound { path: root });
    }
    debug!(env_dir = %root.display(), "Using S2E environment");
    Ok(Environment::new(root))
}

/// Image catalog of `environment`.
pub(crate) fn image_catalog(environment: &Environment) -> DirectoryImageCatalog {
    DirectoryImageCatalog::for_environment(environment)
}
