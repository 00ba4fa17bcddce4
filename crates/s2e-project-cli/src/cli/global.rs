//! Flags shared by every `s2e-project` subcommand.

use clap::Args;
use std::path::PathBuf;

/// Logging, output and location flags, accepted before or after the
/// subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more of what project creation does.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log more detail (-v info, -vv debug, -vvv trace)",
        long_help = "Log more detail to stderr:
    -v      image selection, files written, project summary
    -vv     rendered templates, config layers, filesystem calls
    -vvv    everything, including per-template spans
RUST_LOG overrides these levels when set."
    )]
    pub verbose: u8,

    /// Only errors reach the terminal.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only; implies --yes for `new`"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Do not color messages or the image table"
    )]
    pub no_color: bool,

    /// TOML settings file. When given it must exist, except for `init`,
    /// which creates it.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Settings file (default: the per-user s2e-project config.toml)"
    )]
    pub config: Option<PathBuf>,

    /// Root of the S2E environment holding `images/`, `install/` and
    /// `projects/`.
    #[arg(
        short = 'e',
        long = "env-dir",
        global = true,
        env = "S2EDIR",
        value_name = "DIR",
        help = "S2E environment directory (default: paths.env_dir, then the current directory)"
    )]
    pub env_dir: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How results are printed; json suits scripts"
    )]
    pub output_format: OutputFormat,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Colored messages, spinner and confirmation prompt.
    Human,
    /// Uncolored messages, no spinner.
    Plain,
    /// One JSON document on stdout; messages are suppressed.
    Json,
}
