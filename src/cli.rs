//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use build_recipe::defaults::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};

use crate::commands;

/// Build Recipe - Classify workspace projects and scope git history to them
#[derive(Parser, Debug)]
#[command(name = "build-recipe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the workspace manifest
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = CONFIG_ENV_VAR,
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Workspace root directory. Defaults to the directory of the manifest.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Set log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the manifest recipes and show which matchers configured each project
    Report(commands::report::ReportArgs),

    /// Write per-module change logs for a revision range
    GitLog(commands::git_log::GitLogArgs),

    /// List modules affected by changes in a revision range
    Affected(commands::affected::AffectedArgs),

    /// Show the dependency closure of a project
    Deps(commands::deps::DepsArgs),

    /// Validate the workspace manifest
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.global.log_level);

        match self.command {
            Commands::Report(args) => commands::report::execute(args, &self.global),
            Commands::GitLog(args) => commands::git_log::execute(args, &self.global),
            Commands::Affected(args) => commands::affected::execute(args, &self.global),
            Commands::Deps(args) => commands::deps::execute(args, &self.global),
            Commands::Validate(args) => commands::validate::execute(args, &self.global),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr at `level`, unless RUST_LOG says otherwise.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
