//! # Workflow Planner CLI
//!
//! This is the binary entry point for the `workflow-planner` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging.
//! - Executing the appropriate command and translating errors into
//!   user-friendly output.
//!
//! The planning logic lives in the library crate; the binary is a thin
//! wrapper that shows what a plan or apply of a project would run.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
