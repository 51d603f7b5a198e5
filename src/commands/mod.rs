//! # CLI Command Implementations
//!
//! Each subcommand of the `workflow-planner` tool lives in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `workflow_planner` library to perform the work.
//!
//! `plan` and `apply` share one module because they differ only in the
//! stage they resolve.

pub mod completions;
pub mod stage;
pub mod validate;
