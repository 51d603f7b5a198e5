//! # Workflow Planner Library
//!
//! This library turns the `atlantis.yaml` file at the root of a repository
//! into the ordered steps that a plan or apply of one project should run. It
//! is used by the `workflow-planner` command-line tool but is designed to be
//! embedded by any service that drives terraform on behalf of pull requests.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use workflow_planner::executor::DefaultTerraformExec;
//! use workflow_planner::logging::ContextLogger;
//! use workflow_planner::planner::{ExecutionPlanner, StageRequest};
//!
//! let repo = tempfile::tempdir().unwrap();
//! let planner = ExecutionPlanner::new(Arc::new(DefaultTerraformExec::new()));
//! let request = StageRequest::new(repo.path(), "default", ".", "alice");
//!
//! // With no atlantis.yaml present the defaults apply.
//! let stage = planner
//!     .build_plan_stage(&ContextLogger::new("example"), &request)
//!     .unwrap();
//! assert_eq!(stage.step_names(), vec!["init", "plan"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The raw and validated models of
//!   `atlantis.yaml`, the validation rules, and the normalization that
//!   resolves every default.
//! - **Stages (`stage`)**: `Stage`, the closed `Step` enum and the
//!   `StepMeta` context shared by all steps of one stage.
//! - **Planner (`planner`)**: The resolution algorithm deciding between
//!   default steps and a configured workflow.
//! - **Collaborators (`executor`, `logging`)**: The terraform executor
//!   interface carried by every step and the leveled logging handle.
//!
//! Planning never executes anything and keeps no state between calls.

pub mod config;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod path;
pub mod planner;
pub mod stage;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;
