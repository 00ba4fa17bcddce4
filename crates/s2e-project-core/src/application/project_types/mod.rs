//! Project types.
//!
//! A project type decides what goes into a project directory for a given
//! kind of target. The shared workflow in
//! [`ProjectService`](crate::application::ProjectService) calls the hooks in
//! this order, aborting at the first error:
//!
//! 1. [`ProjectType::validate_binary`] (before anything touches the disk)
//! 2. [`ProjectType::create_dirs`]
//! 3. [`ProjectType::create_bootstrap`]
//! 4. [`ProjectType::create_config`]
//! 5. [`ProjectType::create_instructions`]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{Environment, Instructions, ProjectLayout, RenderContext, SeedPolicy, Target},
    error::ProjectResult,
};

pub mod cgc;

pub use cgc::CgcProject;

/// Format of the `current_time` template variable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Hooks a project type implements.
pub trait ProjectType: Send + Sync {
    /// Short identifier, recorded in `project.json`.
    fn name(&self) -> &'static str;

    /// Seed handling for this type. Defaults to following the caller.
    fn seed_policy(&self) -> SeedPolicy {
        SeedPolicy::Optional
    }

    /// Reject targets this project type cannot analyze. Must not have side
    /// effects.
    fn validate_binary(&self, target: &Target) -> ProjectResult<()>;

    /// Create supporting directories and links inside the project.
    fn create_dirs(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()>;

    /// Render the guest bootstrap script.
    fn create_bootstrap(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()>;

    /// Render the engine configuration files.
    fn create_config(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()>;

    /// Next-step hints for the user.
    fn create_instructions(&self, ctx: &ProjectContext<'_>) -> Instructions;
}

/// Everything a project type may use while populating a project directory.
pub struct ProjectContext<'a> {
    fs: &'a dyn Filesystem,
    renderer: &'a dyn TemplateRenderer,
    environment: &'a Environment,
    target: &'a Target,
    layout: &'a ProjectLayout,
    use_seeds: bool,
    created_at: DateTime<Local>,
}

impl<'a> ProjectContext<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        renderer: &'a dyn TemplateRenderer,
        environment: &'a Environment,
        target: &'a Target,
        layout: &'a ProjectLayout,
        use_seeds: bool,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            fs,
            renderer,
            environment,
            target,
            layout,
            use_seeds,
            created_at,
        }
    }

    pub fn fs(&self) -> &dyn Filesystem {
        self.fs
    }

    pub fn target(&self) -> &Target {
        self.target
    }

    pub fn layout(&self) -> &ProjectLayout {
        self.layout
    }

    pub fn project_path(&self) -> &Path {
        self.layout.root()
    }

    pub fn use_seeds(&self) -> bool {
        self.use_seeds
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// `created_at` formatted for template headers.
    pub fn current_time(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Path inside the engine installation.
    pub fn install_path(&self, parts: &[&str]) -> PathBuf {
        self.environment.install_path(parts)
    }

    /// Render `template` with `context` into `output`, optionally marking the
    /// result executable.
    pub fn render_template(
        &self,
        context: &RenderContext,
        template: &str,
        output: &Path,
        executable: bool,
    ) -> ProjectResult<()> {
        debug!(template, output = %output.display(), executable, "Rendering template");

        let content = self.renderer.render(template, context)?;
        self.fs.write_file(output, &content)?;

        if executable {
            self.fs.set_permissions(output, true)?;
        }
        Ok(())
    }
}
