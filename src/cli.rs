//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use workflow_planner::stage::StageKind;

use crate::commands;

/// Workflow Planner - Resolve atlantis.yaml workflows into plan and apply steps
#[derive(Parser, Debug)]
#[command(name = "workflow-planner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the steps a plan of the project would run
    Plan(commands::stage::StageArgs),

    /// Show the steps an apply of the project would run
    Apply(commands::stage::StageArgs),

    /// Validate the atlantis.yaml of a repository
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Plan(args) => commands::stage::execute(StageKind::Plan, args, &self.color),
            Commands::Apply(args) => commands::stage::execute(StageKind::Apply, args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Install `env_logger`, writing to stderr so stage output stays clean.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second init (e.g. in tests) is harmless.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
