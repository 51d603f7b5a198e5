//! # Execution Planner
//!
//! Resolves, for one (repository, workspace, project path) and one stage
//! kind, the ordered list of steps to run.
//!
//! ## Resolution
//!
//! 1. Read `atlantis.yaml` from the repository root. If it is absent, the
//!    stage's default steps are used.
//! 2. Find the first project whose `dir` and `workspace` both match. If none
//!    matches, or the match sets no `workflow`, the defaults are used.
//! 3. Look the workflow up by name. An unknown name is a hard error: it
//!    means the configuration is broken and must not silently fall back.
//! 4. Expand the workflow's step list for the stage into [`Step`]s that all
//!    share one [`StepMeta`].
//!
//! Parse and validation errors are returned unchanged. Nothing is cached
//! between calls and the planner holds no mutable state, so it can be shared
//! freely across threads.

use crate::config::{Config, ParserValidator, StepConfig};
use crate::defaults::CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::executor::TerraformExec;
use crate::logging::ContextLogger;
use crate::stage::{Stage, StageKind, Step, StepMeta};
use crate::suggestions;
use semver::Version;
use std::path::PathBuf;
use std::sync::Arc;

/// The caller's description of the change being planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRequest {
    /// Root of the repository checkout
    pub repo_dir: PathBuf,
    pub workspace: String,
    /// Project directory relative to `repo_dir`
    pub project_path: String,
    /// Extra arguments the user supplied with their command
    pub extra_comment_args: Vec<String>,
    pub username: String,
}

impl StageRequest {
    pub fn new(
        repo_dir: impl Into<PathBuf>,
        workspace: impl Into<String>,
        project_path: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            workspace: workspace.into(),
            project_path: project_path.into(),
            extra_comment_args: Vec::new(),
            username: username.into(),
        }
    }

    /// Attach the user's extra arguments.
    pub fn with_extra_comment_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_comment_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Turns repository configuration into plan and apply stages.
pub struct ExecutionPlanner {
    terraform_executor: Arc<dyn TerraformExec>,
    default_tf_version: Option<Version>,
    parser_validator: ParserValidator,
}

impl ExecutionPlanner {
    pub fn new(terraform_executor: Arc<dyn TerraformExec>) -> Self {
        Self {
            terraform_executor,
            default_tf_version: None,
            parser_validator: ParserValidator::new(),
        }
    }

    /// Set the terraform version every step is given.
    pub fn with_default_tf_version(mut self, version: Option<Version>) -> Self {
        self.default_tf_version = version;
        self
    }

    pub fn default_tf_version(&self) -> Option<&Version> {
        self.default_tf_version.as_ref()
    }

    /// Build the plan stage. Defaults to `[init, plan]`.
    pub fn build_plan_stage(&self, log: &ContextLogger, request: &StageRequest) -> Result<Stage> {
        self.build_stage(StageKind::Plan, log, request)
    }

    /// Build the apply stage. Defaults to `[apply]`.
    pub fn build_apply_stage(&self, log: &ContextLogger, request: &StageRequest) -> Result<Stage> {
        self.build_stage(StageKind::Apply, log, request)
    }

    fn build_stage(
        &self,
        kind: StageKind,
        log: &ContextLogger,
        request: &StageRequest,
    ) -> Result<Stage> {
        let config = match self.parser_validator.read_config(&request.repo_dir)? {
            Some(config) => config,
            None => {
                log.info(format_args!(
                    "no {CONFIG_FILENAME} file found; continuing with defaults"
                ));
                return Ok(self.default_stage(kind, log, request));
            }
        };

        warn_about_duplicates(&config, log);

        let Some(project) = config.find_project(&request.project_path, &request.workspace)
        else {
            log.info(format_args!(
                "no project with dir {:?} and workspace {:?} defined; continuing with defaults",
                request.project_path, request.workspace
            ));
            return Ok(self.default_stage(kind, log, request));
        };

        let Some(workflow_name) = project.workflow.as_deref() else {
            log.info(format_args!(
                "no workflow set for project {} in {CONFIG_FILENAME}; continuing with defaults",
                project.label()
            ));
            return Ok(self.default_stage(kind, log, request));
        };

        let workflow = config
            .workflows
            .get(workflow_name)
            .ok_or_else(|| Error::UnknownWorkflow {
                name: workflow_name.to_string(),
                hint: suggestions::unknown_workflow_hint(workflow_name, &config.workflow_names()),
            })?;

        log.debug(format_args!(
            "using workflow {:?} for {} stage of {}",
            workflow.name,
            kind,
            project.label()
        ));

        let meta = self.build_meta(log, request);
        Ok(Stage::new(kind, expand(workflow.steps_for(kind), &meta)))
    }

    fn default_stage(&self, kind: StageKind, log: &ContextLogger, request: &StageRequest) -> Stage {
        let meta = self.build_meta(log, request);
        Stage::new(kind, expand(&kind.default_steps(), &meta))
    }

    fn build_meta(&self, log: &ContextLogger, request: &StageRequest) -> Arc<StepMeta> {
        Arc::new(StepMeta {
            log: log.clone(),
            workspace: request.workspace.clone(),
            absolute_path: request.repo_dir.join(&request.project_path),
            dir_relative_to_repo_root: request.project_path.clone(),
            // Steps always receive the planner-wide version.
            terraform_version: self.default_tf_version.clone(),
            terraform_executor: Arc::clone(&self.terraform_executor),
            extra_comment_args: request.extra_comment_args.clone(),
            username: request.username.clone(),
        })
    }
}

fn expand(configs: &[StepConfig], meta: &Arc<StepMeta>) -> Vec<Step> {
    configs
        .iter()
        .map(|config| Step::from_config(config, meta))
        .collect()
}

fn warn_about_duplicates(config: &Config, log: &ContextLogger) {
    for (dir, workspace) in config.duplicate_projects() {
        log.warn(format_args!(
            "project with dir {dir:?} and workspace {workspace:?} is defined more than once in {CONFIG_FILENAME}; only the first entry is used"
        ));
    }
}
