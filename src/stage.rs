//! # Stages and Steps
//!
//! A [`Stage`] is the ordered list of [`Step`]s for one lifecycle phase of a
//! change: `plan` or `apply`. Steps are plain data. Each variant carries only
//! what its operation needs plus an `Arc` to the [`StepMeta`] shared by every
//! step of the stage, so all steps of one stage observe the same context.
//!
//! Running steps is left to the executor behind [`StepMeta::terraform_executor`];
//! [`Step::terraform_args`] shows the arguments it would receive.

use crate::config::StepConfig;
use crate::defaults::{self, USER_VARIABLE};
use crate::executor::TerraformExec;
use crate::logging::ContextLogger;
use semver::Version;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Which lifecycle phase a stage belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Plan,
    Apply,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Plan => "plan",
            StageKind::Apply => "apply",
        }
    }

    /// Steps used when no workflow is configured for a project.
    pub fn default_steps(&self) -> Vec<StepConfig> {
        match self {
            StageKind::Plan => defaults::default_plan_steps(),
            StageKind::Apply => defaults::default_apply_steps(),
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution context shared by every step of one stage.
pub struct StepMeta {
    pub log: ContextLogger,
    pub workspace: String,
    /// The project directory on disk
    pub absolute_path: PathBuf,
    pub dir_relative_to_repo_root: String,
    /// `None` runs whichever terraform is on the path
    pub terraform_version: Option<Version>,
    pub terraform_executor: Arc<dyn TerraformExec>,
    /// Arguments the requesting user appended to their command
    pub extra_comment_args: Vec<String>,
    pub username: String,
}

impl StepMeta {
    /// Where the plan step writes its plan file and apply reads it back.
    pub fn plan_file(&self) -> PathBuf {
        self.absolute_path
            .join(format!("{}.tfplan", self.workspace))
    }
}

impl fmt::Debug for StepMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepMeta")
            .field("log", &self.log)
            .field("workspace", &self.workspace)
            .field("absolute_path", &self.absolute_path)
            .field("dir_relative_to_repo_root", &self.dir_relative_to_repo_root)
            .field("terraform_version", &self.terraform_version)
            .field("extra_comment_args", &self.extra_comment_args)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// One typed operation of a stage
#[derive(Debug, Clone)]
pub enum Step {
    Init {
        extra_args: Vec<String>,
        meta: Arc<StepMeta>,
    },
    Plan {
        extra_args: Vec<String>,
        meta: Arc<StepMeta>,
    },
    Apply {
        extra_args: Vec<String>,
        meta: Arc<StepMeta>,
    },
    Run {
        commands: Vec<String>,
        meta: Arc<StepMeta>,
    },
}

/// Terraform releases before this used `get` instead of `init` for modules.
const INIT_INTRODUCED: Version = Version::new(0, 9, 0);

impl Step {
    /// Build the step described by `config`, sharing `meta`.
    pub fn from_config(config: &StepConfig, meta: &Arc<StepMeta>) -> Self {
        let meta = Arc::clone(meta);
        match config {
            StepConfig::Init { extra_args } => Step::Init {
                extra_args: extra_args.clone(),
                meta,
            },
            StepConfig::Plan { extra_args } => Step::Plan {
                extra_args: extra_args.clone(),
                meta,
            },
            StepConfig::Apply { extra_args } => Step::Apply {
                extra_args: extra_args.clone(),
                meta,
            },
            StepConfig::Run { commands } => Step::Run {
                commands: commands.clone(),
                meta,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Init { .. } => "init",
            Step::Plan { .. } => "plan",
            Step::Apply { .. } => "apply",
            Step::Run { .. } => "run",
        }
    }

    pub fn meta(&self) -> &Arc<StepMeta> {
        match self {
            Step::Init { meta, .. }
            | Step::Plan { meta, .. }
            | Step::Apply { meta, .. }
            | Step::Run { meta, .. } => meta,
        }
    }

    /// Configured extra arguments; empty for run steps.
    pub fn extra_args(&self) -> &[String] {
        match self {
            Step::Init { extra_args, .. }
            | Step::Plan { extra_args, .. }
            | Step::Apply { extra_args, .. } => extra_args,
            Step::Run { .. } => &[],
        }
    }

    /// Shell commands; empty for terraform steps.
    pub fn commands(&self) -> &[String] {
        match self {
            Step::Run { commands, .. } => commands,
            _ => &[],
        }
    }

    /// The argument vector the executor would pass to terraform, or `None`
    /// for run steps.
    pub fn terraform_args(&self) -> Option<Vec<String>> {
        let meta = self.meta();
        let plan_file = meta.plan_file().display().to_string();
        let mut args: Vec<String> = Vec::new();

        match self {
            Step::Init { extra_args, .. } => {
                let legacy = meta
                    .terraform_version
                    .as_ref()
                    .is_some_and(|v| *v < INIT_INTRODUCED);
                args.push(if legacy { "get" } else { "init" }.to_string());
                args.push("-no-color".to_string());
                args.extend(extra_args.iter().cloned());
            }
            Step::Plan { extra_args, .. } => {
                args.extend(
                    ["plan", "-refresh", "-no-color", "-out"]
                        .iter()
                        .map(|s| s.to_string()),
                );
                args.push(plan_file);
                args.push("-var".to_string());
                args.push(format!("{USER_VARIABLE}={}", meta.username));
                args.extend(extra_args.iter().cloned());
                args.extend(meta.extra_comment_args.iter().cloned());
            }
            Step::Apply { extra_args, .. } => {
                args.push("apply".to_string());
                args.push("-no-color".to_string());
                args.extend(extra_args.iter().cloned());
                args.extend(meta.extra_comment_args.iter().cloned());
                args.push(plan_file);
            }
            Step::Run { .. } => return None,
        }

        Some(args)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terraform_args() {
            Some(args) => write!(f, "terraform {}", args.join(" ")),
            None => write!(f, "run: {}", self.commands().join(" && ")),
        }
    }
}

/// An ordered list of steps for one phase
#[derive(Debug, Clone)]
pub struct Stage {
    pub kind: StageKind,
    pub steps: Vec<Step>,
}

impl Stage {
    pub fn new(kind: StageKind, steps: Vec<Step>) -> Self {
        Self { kind, steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Step names in order, e.g. `["init", "plan"]`.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// The context shared by the steps, if there are any.
    pub fn meta(&self) -> Option<&Arc<StepMeta>> {
        self.steps.first().map(Step::meta)
    }
}

impl<'a> IntoIterator for &'a Stage {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage ({} steps)", self.kind, self.steps.len())?;
        for (idx, step) in self.steps.iter().enumerate() {
            write!(f, "\n  {}. {}", idx + 1, step)?;
        }
        Ok(())
    }
}
