//! Default values for workflow-planner configuration.
//!
//! This module provides centralized default values used across the config
//! layer and the planner, ensuring consistency and avoiding duplication.
//! Everything here is read-only for the lifetime of the process.

use crate::config::StepConfig;

/// Name of the configuration file looked up at the repository root.
pub const CONFIG_FILENAME: &str = "atlantis.yaml";

/// Workspace used when a project entry does not name one.
pub const DEFAULT_WORKSPACE: &str = "default";

/// The only apply requirement currently understood.
pub const APPROVED_APPLY_REQUIREMENT: &str = "approved";

/// The configuration `version` value this crate understands.
pub const SUPPORTED_CONFIG_VERSION: u32 = 2;

/// Terraform variable that receives the requesting user's name during plan.
pub const USER_VARIABLE: &str = "atlantis_user";

/// Glob patterns that trigger autoplan when a project sets none.
///
/// Patterns are relative to the project directory.
pub fn default_autoplan_when_modified() -> Vec<String> {
    vec!["**/*.tf".to_string()]
}

/// Whether autoplan is on when a project does not say.
pub const DEFAULT_AUTOPLAN_ENABLED: bool = true;

/// Steps run during the plan stage when no workflow applies.
pub fn default_plan_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::Init {
            extra_args: Vec::new(),
        },
        StepConfig::Plan {
            extra_args: Vec::new(),
        },
    ]
}

/// Steps run during the apply stage when no workflow applies.
pub fn default_apply_steps() -> Vec<StepConfig> {
    vec![StepConfig::Apply {
        extra_args: Vec::new(),
    }]
}
