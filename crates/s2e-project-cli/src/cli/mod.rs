//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "s2e-project",
    bin_name = "s2e-project",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Create S2E analysis projects",
    long_about = "s2e-project sets up a project directory for analyzing a binary \
                  with S2E: bootstrap script, engine configuration, seeds and \
                  recipe links.",
    after_help = "EXAMPLES:\n\
        \x20 s2e-project new ./CADET_00001 --image cgc_debian-9.2.1-i386\n\
        \x20 s2e-project images\n\
        \x20 s2e-project --env-dir ~/s2e new ./CROMU_00001 --name cromu-1\n\
        \x20 s2e-project completions bash > /usr/share/bash-completion/completions/s2e-project",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new analysis project for a binary.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 s2e-project new ./CADET_00001\n\
            \x20 s2e-project new ./CADET_00001 --image cgc_debian-9.2.1-i386 --name cadet\n\
            \x20 s2e-project new ./CADET_00001 --dry-run"
    )]
    New(NewArgs),

    /// List the guest images of the environment.
    #[command(
        visible_alias = "ls",
        about = "List available guest images",
        after_help = "EXAMPLES:\n\
            \x20 s2e-project images\n\
            \x20 s2e-project images --format json"
    )]
    Images(ImagesArgs),

    /// Initialise a configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 s2e-project init            # default location\n\
            \x20 s2e-project -c ./s2e.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 s2e-project completions bash > ~/.local/share/bash-completion/completions/s2e-project\n\
            \x20 s2e-project completions zsh  > ~/.zfunc/_s2e-project\n\
            \x20 s2e-project completions fish > ~/.config/fish/completions/s2e-project.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 s2e-project config get paths.env_dir\n\
            \x20 s2e-project config list\n\
            \x20 s2e-project config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `s2e-project new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Binary to analyze.
    #[arg(value_name = "TARGET", help = "Path to the binary to analyze")]
    pub target: PathBuf,

    /// Kind of project to create.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        value_enum,
        default_value = "cgc",
        help = "Project type"
    )]
    pub project_type: ProjectTypeArg,

    /// Project directory name under `<env>/projects`.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        help = "Project name (default: the target's file name)"
    )]
    pub name: Option<String>,

    /// Guest image to run the target in.
    #[arg(
        short = 'i',
        long = "image",
        value_name = "IMAGE",
        help = "Guest image (default: first image that runs the target)"
    )]
    pub image: Option<String>,

    /// Do not drive execution with seed files.
    #[arg(long = "no-seeds", help = "Disable seed files (ignored by CGC projects)")]
    pub no_seeds: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Delete an existing project of the same name first (destructive).
    #[arg(long = "force", help = "Overwrite existing project")]
    pub force: bool,

    /// Validate and describe without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// Project types the CLI can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectTypeArg {
    /// CGC challenge binaries (DECREE).
    #[value(alias = "decree")]
    Cgc,
}

// ── images ────────────────────────────────────────────────────────────────────

/// Arguments for `s2e-project images`.
#[derive(Debug, Args)]
pub struct ImagesArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `images` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `s2e-project init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `s2e-project completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `s2e-project config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `paths.env_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "s2e-project",
            "new",
            "./CADET_00001",
            "--image",
            "cgc_debian-9.2.1-i386",
            "--no-seeds",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.target, PathBuf::from("./CADET_00001"));
        assert_eq!(args.image.as_deref(), Some("cgc_debian-9.2.1-i386"));
        assert_eq!(args.project_type, ProjectTypeArg::Cgc);
        assert!(args.no_seeds);
        assert!(!args.force);
    }

    #[test]
    fn decree_is_an_alias_for_cgc() {
        let cli = Cli::parse_from(["s2e-project", "new", "bin", "-t", "decree"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.project_type, ProjectTypeArg::Cgc);
    }

    #[test]
    fn new_requires_target() {
        assert!(Cli::try_parse_from(["s2e-project", "new"]).is_err());
    }

    #[test]
    fn images_format() {
        let cli = Cli::parse_from(["s2e-project", "ls", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Images(ImagesArgs {
                format: ListFormat::Json
            })
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["s2e-project", "--quiet", "--verbose", "images"]);
        assert!(result.is_err());
    }

    #[test]
    fn env_dir_is_global() {
        let cli = Cli::parse_from(["s2e-project", "images", "--env-dir", "/opt/s2e"]);
        assert_eq!(cli.global.env_dir, Some(PathBuf::from("/opt/s2e")));
    }
}
