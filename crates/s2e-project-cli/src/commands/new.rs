//! Implementation of the `s2e-project new` command.
//!
//! Responsibility: translate CLI arguments into a `CreateRequest`, call the
//! core project service, and display results. No business logic lives here.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use s2e_project_adapters::{LocalFilesystem, JinjaRenderer, TemplateLibrary};
use s2e_project_core::{
    application::{CgcProject, CreateRequest, ProjectPlan, ProjectService, ProjectType},
    domain::Environment,
};

use crate::{
    cli::{GlobalArgs, NewArgs, ProjectTypeArg},
    commands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Machine-readable result of `new`, printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct NewReport<'a> {
    created: bool,
    project_type: &'a str,
    project_dir: &'a Path,
    target: &'a Path,
    image: &'a str,
    use_seeds: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
}

impl<'a> NewReport<'a> {
    fn planned(plan: &'a ProjectPlan) -> Self {
        Self {
            created: false,
            project_type: plan.project_type,
            project_dir: plan.layout.root(),
            target: plan.target.path(),
            image: &plan.target.image().name,
            use_seeds: plan.use_seeds,
            instructions: None,
        }
    }
}

/// Execute the `s2e-project new` command.
///
/// Dispatch sequence:
/// 1. Resolve the environment and build the adapters
/// 2. Plan the project (all validation, nothing written)
/// 3. Early-exit if `--dry-run`
/// 4. Confirm with the user unless `--yes`, `--quiet` or non-interactive
/// 5. Create the project via `ProjectService`
/// 6. Print the instructions
#[instrument(skip_all, fields(target = %args.target.display()))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Environment + adapters
    let environment = commands::environment(&global, &config)?;
    let service = build_service(environment, &config)?;
    let project_type = select_project_type(args.project_type);
    let request = build_request(&args);

    debug!(?request, project_type = project_type.name(), "Request built");

    // 2. Plan
    let plan = service
        .plan(project_type, &request)
        .with_cli_context(|| "planning project")?;

    if args.no_seeds && plan.use_seeds {
        output.warning(&format!(
            "{} projects always use seeds; ignoring --no-seeds",
            plan.project_type
        ))?;
    }

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        if output.is_json() {
            output.json(&NewReport::planned(&plan))?;
        } else {
            output.info("Dry run: nothing will be written")?;
            show_plan(&plan, &output)?;
        }
        return Ok(());
    }

    // 4. Confirm
    if needs_confirmation(&args, &output) {
        show_plan(&plan, &output)?;
        if plan.replaces_existing {
            output.warning(&format!(
                "The existing project at {} will be deleted",
                plan.layout.root().display()
            ))?;
        }
        if !confirm("Create this project?")? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Create
    output.header(&format!("Creating project '{}'...", project_name(&plan)))?;
    info!(path = %plan.layout.root().display(), "Project creation started");

    let spinner = output.spinner("Rendering bootstrap script and configuration");
    let created = service.create(project_type, &request);
    spinner.finish_and_clear();
    let summary = created.with_cli_context(|| "creating project")?;

    info!(path = %summary.layout.root().display(), "Project creation completed");

    // 6. Report
    if output.is_json() {
        output.json(&NewReport {
            created: true,
            project_type: summary.project_type,
            project_dir: summary.layout.root(),
            target: summary.target.path(),
            image: &summary.target.image().name,
            use_seeds: summary.use_seeds,
            instructions: Some(&summary.instructions),
        })?;
        return Ok(());
    }

    output.success(&format!(
        "Project created at {}",
        summary.layout.root().display()
    ))?;
    output.print("")?;
    output.print(&summary.instructions)?;

    Ok(())
}

// ── Service construction ──────────────────────────────────────────────────────

fn build_service(environment: Environment, config: &AppConfig) -> CliResult<ProjectService> {
    let library = TemplateLibrary::with_builtin().with_cli_context(|| "loading templates")?;

    if let Some(dir) = config.templates.local_path.as_deref() {
        let loaded = library
            .load_overrides(dir)
            .with_cli_context(|| format!("loading templates from {}", dir.display()))?;
        debug!(dir = %dir.display(), loaded, "Template overrides loaded");
    }

    let catalog = commands::image_catalog(&environment);
    Ok(ProjectService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(JinjaRenderer::new(library)),
        Box::new(catalog),
        environment,
    ))
}

fn select_project_type(arg: ProjectTypeArg) -> &'static dyn ProjectType {
    match arg {
        ProjectTypeArg::Cgc => &CgcProject,
    }
}

fn build_request(args: &NewArgs) -> CreateRequest {
    let mut request = CreateRequest::new(absolute(&args.target))
        .with_seeds(!args.no_seeds)
        .with_force(args.force);
    if let Some(name) = &args.name {
        request = request.with_name(name);
    }
    if let Some(image) = &args.image {
        request = request.with_image(image);
    }
    request
}

/// Make `path` absolute against the working directory, without touching
/// the filesystem; the service canonicalizes it later.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn project_name(plan: &ProjectPlan) -> String {
    plan.layout
        .root()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn show_plan(plan: &ProjectPlan, out: &OutputManager) -> CliResult<()> {
    let os = plan.target.os();
    out.header("Project")?;
    out.field("Type:", plan.project_type)?;
    out.field("Target:", &plan.target.path().display().to_string())?;
    out.field(
        "Binary:",
        &format!("{} ({})", plan.target.format(), plan.target.arch()),
    )?;
    out.field(
        "Image:",
        &format!("{} ({} {})", plan.target.image().name, os.name, os.arch),
    )?;
    out.field("Seeds:", if plan.use_seeds { "yes" } else { "no" })?;
    out.field("Location:", &plan.layout.root().display().to_string())?;
    out.print("")?;
    Ok(())
}

fn needs_confirmation(args: &NewArgs, output: &OutputManager) -> bool {
    !args.yes && !output.is_quiet() && !output.is_json() && std::io::stdin().is_terminal()
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::{self, Write};

    print!("{prompt} [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
