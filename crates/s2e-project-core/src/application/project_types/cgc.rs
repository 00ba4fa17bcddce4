//! CGC (DECREE) projects.
//!
//! CGC binaries only run on images whose guest declares the `decree` binary
//! format. Projects always use seeds: the recipe plugin finds its inputs
//! through the seed searcher, so `seeds/` is created and seed-driven
//! execution is switched on no matter what the caller asked for.

use std::path::Path;

use tracing::info;

use crate::{
    application::project_types::{ProjectContext, ProjectType},
    domain::{
        CONFIG_FILES, Instructions, RenderContext, SEED_NAME_PATTERN, SeedFile, SeedPolicy, Target,
    },
    error::{ProjectError, ProjectResult},
};

/// Format the guest must declare for CGC binaries.
pub const REQUIRED_FORMAT: &str = "decree";
/// Shared recipe repository, relative to the installation root.
pub const RECIPES_DIR: [&str; 2] = ["share", "decree-recipes"];
/// Template rendered into `bootstrap.sh`.
pub const BOOTSTRAP_TEMPLATE: &str = "bootstrap.cgc.sh";
/// Target-specific layer included by `s2e-config.lua`.
pub const TARGET_LUA_TEMPLATE: &str = "s2e-config.cgc.lua";

const INTRO: &str = "Here are some hints to get started with your CGC project:";

/// Creates projects for CGC challenge binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CgcProject;

impl CgcProject {
    pub fn new() -> Self {
        Self
    }

    /// Variables shared by the bootstrap script and configuration files.
    fn base_context(ctx: &ProjectContext<'_>) -> RenderContext {
        RenderContext::new()
            .with_text("current_time", ctx.current_time())
            .with_text("target", ctx.target().basename())
            .with_flag("use_seeds", ctx.use_seeds())
    }
}

impl ProjectType for CgcProject {
    fn name(&self) -> &'static str {
        "cgc"
    }

    fn seed_policy(&self) -> SeedPolicy {
        SeedPolicy::Required
    }

    fn validate_binary(&self, target: &Target) -> ProjectResult<()> {
        if !target.os().declares(REQUIRED_FORMAT) {
            return Err(ProjectError::configuration(
                "Please use a CGC image for this binary",
            ));
        }
        Ok(())
    }

    fn create_dirs(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()> {
        let recipes = ctx.install_path(&RECIPES_DIR);
        let layout = ctx.layout();

        info!(recipes = %recipes.display(), "Creating a symlink to the recipes directory");
        ctx.fs().symlink(&recipes, &layout.recipes_link())?;

        // Recipes are found through the seed searcher, which needs the
        // directory even when seeds are switched off.
        ctx.fs().create_dir(&layout.seeds_dir())?;
        Ok(())
    }

    fn create_bootstrap(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()> {
        let context = Self::base_context(ctx);
        ctx.render_template(&context, BOOTSTRAP_TEMPLATE, &ctx.layout().bootstrap(), true)
    }

    fn create_config(&self, ctx: &ProjectContext<'_>) -> ProjectResult<()> {
        let context = Self::base_context(ctx)
            .with_text("project_dir", ctx.project_path().display().to_string())
            .with_text("target_lua_template", TARGET_LUA_TEMPLATE);

        for file in CONFIG_FILES {
            ctx.render_template(&context, file, &ctx.layout().join(file), false)?;
        }
        Ok(())
    }

    fn create_instructions(&self, ctx: &ProjectContext<'_>) -> Instructions {
        let mut instructions = Instructions::new().section(INTRO);
        if ctx.use_seeds() {
            instructions.push(seed_instructions(&ctx.layout().seeds_dir()));
        }
        instructions
    }
}

/// Seeds listed as naming examples.
const EXAMPLE_SEEDS: [SeedFile; 3] = [SeedFile::new(0, 1), SeedFile::new(1, 1), SeedFile::new(2, 0)];

/// Explains where seeds go and how they must be named.
pub fn seed_instructions(seeds_dir: &Path) -> String {
    let examples = EXAMPLE_SEEDS
        .iter()
        .map(SeedFile::file_name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Seed Files\n\
         ==========\n\
         \n\
         Seed files have been enabled. This means that seed files will be \
         used to drive concolic execution. Please place seeds in \
         {seeds_dir}. Seed files must be named using the following \
         format:\n\
         \n\
         \t``{SEED_NAME_PATTERN}``\n\
         \n\
         Where:\n\
         \t* <index> is a unique integer identifier starting from 0\n\
         \t* <priority> is an integer priority, where 0 is the highest \
         priority\n\
         Examples:\n\
         \t{examples}, etc.\n\
         \n\
         Seeds can be based on real files, generated by a fuzzer, or \
         randomly.",
        seeds_dir = seeds_dir.display(),
    )
}
