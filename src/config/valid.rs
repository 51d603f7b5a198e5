//! # Validated Configuration Model
//!
//! The canonical form of `atlantis.yaml` after validation. Every default is
//! resolved, so consumers never have to reason about a missing workspace or
//! autoplan block.

use crate::defaults::{self, DEFAULT_AUTOPLAN_ENABLED};
use crate::path::{glob_match, relative_to_project};
use crate::stage::StageKind;
use semver::Version;
use std::collections::{BTreeMap, HashMap};

/// A fully validated configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub version: Option<u32>,
    /// Projects in file order. Lookups take the first match.
    pub projects: Vec<Project>,
    pub workflows: BTreeMap<String, Workflow>,
}

/// A validated project entry
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: Option<String>,
    /// Directory relative to the repository root, never empty
    pub dir: String,
    /// Never empty; `default` unless configured
    pub workspace: String,
    /// Absent means the default steps run
    pub workflow: Option<String>,
    pub terraform_version: Option<Version>,
    pub autoplan: Autoplan,
    pub apply_requirements: Vec<String>,
}

/// Resolved autoplan policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autoplan {
    /// Glob patterns relative to the project directory
    pub when_modified: Vec<String>,
    pub enabled: bool,
}

impl Default for Autoplan {
    fn default() -> Self {
        Self {
            when_modified: defaults::default_autoplan_when_modified(),
            enabled: DEFAULT_AUTOPLAN_ENABLED,
        }
    }
}

/// A named workflow with both stages resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub plan: Vec<StepConfig>,
    pub apply: Vec<StepConfig>,
}

/// One configured step. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepConfig {
    Init { extra_args: Vec<String> },
    Plan { extra_args: Vec<String> },
    Apply { extra_args: Vec<String> },
    Run { commands: Vec<String> },
}

impl Config {
    /// The first project whose dir and workspace both match exactly.
    ///
    /// Later entries with the same pair are never returned.
    pub fn find_project(&self, dir: &str, workspace: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.dir == dir && p.workspace == workspace)
    }

    /// (dir, workspace) pairs declared more than once, in order of first
    /// appearance.
    pub fn duplicate_projects(&self) -> Vec<(String, String)> {
        let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
        for project in &self.projects {
            *counts
                .entry((project.dir.as_str(), project.workspace.as_str()))
                .or_default() += 1;
        }

        let mut duplicates = Vec::new();
        for project in &self.projects {
            let key = (project.dir.as_str(), project.workspace.as_str());
            if counts.get(&key).copied().unwrap_or(0) > 1
                && !duplicates
                    .iter()
                    .any(|(d, w): &(String, String)| d == key.0 && w == key.1)
            {
                duplicates.push((key.0.to_string(), key.1.to_string()));
            }
        }
        duplicates
    }

    /// Projects that name a workflow the file does not define.
    pub fn dangling_workflow_refs(&self) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| {
                p.workflow
                    .as_ref()
                    .is_some_and(|name| !self.workflows.contains_key(name))
            })
            .collect()
    }

    /// Names of all defined workflows, sorted.
    pub fn workflow_names(&self) -> Vec<&str> {
        self.workflows.keys().map(String::as_str).collect()
    }
}

impl Project {
    /// Whether a change touching `modified_files` (repo-relative paths)
    /// should plan this project automatically.
    pub fn autoplan_triggered_by<S: AsRef<str>>(&self, modified_files: &[S]) -> bool {
        if !self.autoplan.enabled {
            return false;
        }
        modified_files.iter().any(|file| {
            let relative = relative_to_project(&self.dir, file.as_ref());
            let outside = relative.starts_with("../");
            self.autoplan
                .when_modified
                .iter()
                // `**` would otherwise match `..` segments
                .filter(|pattern| !outside || pattern.starts_with("../"))
                .any(|pattern| glob_match(pattern, &relative).unwrap_or(false))
        })
    }

    /// A human-readable label, preferring the configured name.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} ({})", self.dir, self.workspace),
        }
    }
}

impl Workflow {
    /// The step list configured for `kind`.
    pub fn steps_for(&self, kind: StageKind) -> &[StepConfig] {
        match kind {
            StageKind::Plan => &self.plan,
            StageKind::Apply => &self.apply,
        }
    }
}

impl StepConfig {
    /// The YAML type tag for this step.
    pub fn kind(&self) -> &'static str {
        match self {
            StepConfig::Init { .. } => "init",
            StepConfig::Plan { .. } => "plan",
            StepConfig::Apply { .. } => "apply",
            StepConfig::Run { .. } => "run",
        }
    }
}
