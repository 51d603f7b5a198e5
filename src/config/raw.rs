//! # Raw Configuration Model
//!
//! These types mirror `atlantis.yaml` exactly as written: every field a user
//! may omit is an `Option`. Nothing here is trusted until `validate` has
//! succeeded, after which `to_valid` resolves every default and produces the
//! canonical types in [`crate::config::valid`].

use crate::config::valid::{Autoplan, Config, Project, StepConfig, Workflow};
use crate::defaults::{
    self, APPROVED_APPLY_REQUIREMENT, DEFAULT_AUTOPLAN_ENABLED, DEFAULT_WORKSPACE,
    SUPPORTED_CONFIG_VERSION,
};
use crate::error::{Error, Result};
use crate::path::has_parent_traversal;
use glob::Pattern;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Config format version; when present it must be 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Project entries, in file order
    #[serde(default)]
    pub projects: Vec<RawProject>,
    /// Named workflows
    #[serde(default)]
    pub workflows: BTreeMap<String, RawWorkflow>,
}

/// A single entry under `projects:`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplan: Option<RawAutoplan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_requirements: Option<Vec<String>>,
}

/// Autoplan settings for a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAutoplan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_modified: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// A named workflow under `workflows:`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<RawStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply: Option<RawStage>,
}

/// The step list of one stage inside a workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStage {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

/// A step as written in YAML.
///
/// Either a bare type tag (`- init`) or a single-key mapping
/// (`- plan: {extra_args: [...]}`, `- run: make test`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStep {
    Key(String),
    Map(BTreeMap<String, RawStepBody>),
}

/// The value under a keyed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStepBody {
    /// `run: <command>`
    Command(String),
    /// `run: [<command>, ...]`
    Commands(Vec<String>),
    /// `init|plan|apply: {extra_args: [...]}`
    Args(RawStepArgs),
    /// `init:` with nothing after it
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStepArgs {
    #[serde(default)]
    pub extra_args: Vec<String>,
}

const INIT_STEP: &str = "init";
const PLAN_STEP: &str = "plan";
const APPLY_STEP: &str = "apply";
const RUN_STEP: &str = "run";

/// Parses a YAML string into a `RawConfig` without validating it.
pub fn parse(yaml_content: &str) -> Result<RawConfig> {
    Ok(serde_yaml::from_str(yaml_content)?)
}

/// Parse a terraform version string.
///
/// A leading `v` is ignored and missing minor or patch parts are read as
/// zero, so `0.12` parses as `0.12.0`.
pub fn parse_terraform_version(version: &str) -> std::result::Result<Version, semver::Error> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let (core, suffix) = version.split_at(version.find(['-', '+']).unwrap_or(version.len()));
    let mut padded = core.to_string();
    for _ in core.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    Version::parse(&padded)
}

impl RawConfig {
    /// Validate the version, then every project, then every workflow.
    ///
    /// The first failure is returned with its location in the file.
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.version {
            if version != SUPPORTED_CONFIG_VERSION {
                return Err(Error::validation(
                    "version",
                    format!(
                        "version {version} is not supported, only version {SUPPORTED_CONFIG_VERSION} is supported"
                    ),
                ));
            }
        }

        for (idx, project) in self.projects.iter().enumerate() {
            project
                .validate()
                .map_err(|e| e.within(&format!("projects[{idx}]")))?;
        }

        for (name, workflow) in &self.workflows {
            workflow
                .validate()
                .map_err(|e| e.within(&format!("workflows.{name}")))?;
        }

        Ok(())
    }

    /// Convert into the canonical form. Call only after `validate`.
    pub fn to_valid(&self) -> Config {
        Config {
            version: self.version,
            projects: self.projects.iter().map(RawProject::to_valid).collect(),
            workflows: self
                .workflows
                .iter()
                .map(|(name, workflow)| (name.clone(), workflow.to_valid(name)))
                .collect(),
        }
    }
}

impl RawProject {
    /// Check the entry against the rules every project must satisfy.
    pub fn validate(&self) -> Result<()> {
        match self.dir.as_deref() {
            None | Some("") => return Err(Error::validation("dir", "cannot be blank")),
            Some(dir) if has_parent_traversal(dir) => {
                return Err(Error::validation("dir", "cannot contain '..'"))
            }
            Some(_) => {}
        }

        if let Some(workspace) = self.workspace.as_deref() {
            if workspace.is_empty() {
                return Err(Error::validation("workspace", "cannot be blank"));
            }
        }

        for requirement in self.apply_requirements.iter().flatten() {
            if requirement != APPROVED_APPLY_REQUIREMENT {
                return Err(Error::validation(
                    "apply_requirements",
                    format!(
                        "{requirement:?} not supported, only {APPROVED_APPLY_REQUIREMENT} is supported"
                    ),
                ));
            }
        }

        if let Some(version) = self.terraform_version.as_deref() {
            parse_terraform_version(version).map_err(|source| {
                Error::InvalidTerraformVersion {
                    field: "terraform_version".to_string(),
                    version: version.to_string(),
                    source,
                }
            })?;
        }

        if let Some(autoplan) = &self.autoplan {
            autoplan.validate().map_err(|e| e.within("autoplan"))?;
        }

        Ok(())
    }

    /// Resolve defaults. Assumes `validate` already succeeded.
    pub fn to_valid(&self) -> Project {
        Project {
            name: self.name.clone(),
            dir: self.dir.clone().unwrap_or_default(),
            workspace: self
                .workspace
                .clone()
                .unwrap_or_else(|| DEFAULT_WORKSPACE.to_string()),
            // An empty workflow name means no workflow.
            workflow: self.workflow.clone().filter(|name| !name.is_empty()),
            terraform_version: self
                .terraform_version
                .as_deref()
                .and_then(|v| parse_terraform_version(v).ok()),
            autoplan: self
                .autoplan
                .as_ref()
                .map(RawAutoplan::to_valid)
                .unwrap_or_default(),
            // There are no default apply requirements.
            apply_requirements: self.apply_requirements.clone().unwrap_or_default(),
        }
    }
}

impl RawAutoplan {
    pub fn validate(&self) -> Result<()> {
        for pattern in self.when_modified.iter().flatten() {
            Pattern::new(pattern).map_err(|e| {
                Error::validation("when_modified", format!("invalid glob {pattern:?}: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn to_valid(&self) -> Autoplan {
        Autoplan {
            when_modified: self
                .when_modified
                .clone()
                .unwrap_or_else(defaults::default_autoplan_when_modified),
            enabled: self.enabled.unwrap_or(DEFAULT_AUTOPLAN_ENABLED),
        }
    }
}

impl RawWorkflow {
    pub fn validate(&self) -> Result<()> {
        if let Some(plan) = &self.plan {
            plan.validate().map_err(|e| e.within("plan"))?;
        }
        if let Some(apply) = &self.apply {
            apply.validate().map_err(|e| e.within("apply"))?;
        }
        Ok(())
    }

    /// A stage the workflow leaves out runs the default steps; an explicit
    /// empty `steps` list stays empty.
    pub fn to_valid(&self, name: &str) -> Workflow {
        Workflow {
            name: name.to_string(),
            plan: self
                .plan
                .as_ref()
                .map(RawStage::to_valid)
                .unwrap_or_else(defaults::default_plan_steps),
            apply: self
                .apply
                .as_ref()
                .map(RawStage::to_valid)
                .unwrap_or_else(defaults::default_apply_steps),
        }
    }
}

impl RawStage {
    pub fn validate(&self) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| e.within(&format!("steps[{idx}]")))?;
        }
        Ok(())
    }

    pub fn to_valid(&self) -> Vec<StepConfig> {
        self.steps.iter().filter_map(RawStep::to_valid).collect()
    }
}

impl RawStep {
    /// Reject unknown type tags and bodies that do not fit their tag.
    ///
    /// Errors are reported relative to the step itself; callers anchor them
    /// with [`Error::within`].
    pub fn validate(&self) -> Result<()> {
        match self {
            RawStep::Key(key) => match key.as_str() {
                INIT_STEP | PLAN_STEP | APPLY_STEP => Ok(()),
                RUN_STEP => Err(Error::validation(
                    RUN_STEP,
                    "a run step needs a command, e.g. `run: make test`",
                )),
                other => Err(unknown_step(other)),
            },
            RawStep::Map(map) => {
                let mut entries = map.iter();
                let (key, body) = match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    (None, _) => {
                        return Err(Error::validation("step", "step cannot be empty"));
                    }
                    (Some(_), Some(_)) => {
                        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                        return Err(Error::validation(
                            "step",
                            format!(
                                "step can only have one key, found {}",
                                keys.join(", ")
                            ),
                        ));
                    }
                };

                match (key.as_str(), body) {
                    (
                        INIT_STEP | PLAN_STEP | APPLY_STEP,
                        RawStepBody::Args(_) | RawStepBody::Empty,
                    ) => Ok(()),
                    (INIT_STEP | PLAN_STEP | APPLY_STEP, _) => Err(Error::validation(
                        key.as_str(),
                        "only `extra_args` is supported, e.g. `extra_args: [\"-lock=false\"]`",
                    )),
                    (RUN_STEP, RawStepBody::Command(command)) if command.trim().is_empty() => {
                        Err(Error::validation(RUN_STEP, "command cannot be blank"))
                    }
                    (RUN_STEP, RawStepBody::Commands(commands))
                        if commands.is_empty()
                            || commands.iter().any(|c| c.trim().is_empty()) =>
                    {
                        Err(Error::validation(
                            RUN_STEP,
                            "commands cannot be empty or blank",
                        ))
                    }
                    (RUN_STEP, RawStepBody::Command(_) | RawStepBody::Commands(_)) => Ok(()),
                    (RUN_STEP, RawStepBody::Empty) => Err(Error::validation(
                        RUN_STEP,
                        "a run step needs a command, e.g. `run: make test`",
                    )),
                    (RUN_STEP, RawStepBody::Args(_)) => Err(Error::validation(
                        RUN_STEP,
                        "expected a command or a list of commands",
                    )),
                    (other, _) => Err(unknown_step(other)),
                }
            }
        }
    }

    /// Convert a validated step. Returns `None` only for input that
    /// `validate` rejects.
    pub fn to_valid(&self) -> Option<StepConfig> {
        match self {
            RawStep::Key(key) => step_with_args(key, Vec::new()),
            RawStep::Map(map) => {
                let (key, body) = map.iter().next()?;
                match body {
                    RawStepBody::Args(args) => step_with_args(key, args.extra_args.clone()),
                    RawStepBody::Empty => step_with_args(key, Vec::new()),
                    RawStepBody::Command(command) if key == RUN_STEP => Some(StepConfig::Run {
                        commands: vec![command.clone()],
                    }),
                    RawStepBody::Commands(commands) if key == RUN_STEP => Some(StepConfig::Run {
                        commands: commands.clone(),
                    }),
                    _ => None,
                }
            }
        }
    }
}

fn step_with_args(key: &str, extra_args: Vec<String>) -> Option<StepConfig> {
    match key {
        INIT_STEP => Some(StepConfig::Init { extra_args }),
        PLAN_STEP => Some(StepConfig::Plan { extra_args }),
        APPLY_STEP => Some(StepConfig::Apply { extra_args }),
        _ => None,
    }
}

fn unknown_step(step: &str) -> Error {
    Error::UnknownStepType {
        location: "step".to_string(),
        step: step.to_string(),
    }
}
