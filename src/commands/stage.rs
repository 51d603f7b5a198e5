//! # Plan and Apply Command Implementation
//!
//! Resolves the plan or apply stage for one project of a repository checkout
//! and prints the steps it would run. Nothing is executed.
//!
//! ## Example
//!
//! ```bash
//! workflow-planner plan --dir infra/web -w staging -- -target=module.vpc
//! workflow-planner apply --dir infra/web --format json
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use workflow_planner::config::parse_terraform_version;
use workflow_planner::defaults::DEFAULT_WORKSPACE;
use workflow_planner::executor::DefaultTerraformExec;
use workflow_planner::logging::ContextLogger;
use workflow_planner::output::{emoji, step_label, OutputConfig};
use workflow_planner::planner::{ExecutionPlanner, StageRequest};
use workflow_planner::stage::{Stage, StageKind, Step};
use workflow_planner::suggestions;

/// How to print the resolved stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Numbered, human-readable list
    Text,
    /// Machine-readable JSON document
    Json,
}

/// Arguments shared by `plan` and `apply`
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Root of the repository checkout
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// Project directory, relative to the repository root
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub dir: String,

    /// Terraform workspace
    #[arg(short, long, value_name = "NAME", default_value = DEFAULT_WORKSPACE)]
    pub workspace: String,

    /// Name of the user requesting the change
    #[arg(long, value_name = "NAME", env = "USER", default_value = "unknown")]
    pub user: String,

    /// Terraform version given to every step
    #[arg(long, value_name = "VERSION", env = "WORKFLOW_PLANNER_TF_VERSION")]
    pub default_terraform_version: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Extra terraform arguments, as a user would append them to a comment
    #[arg(last = true, value_name = "EXTRA_ARGS")]
    pub extra_args: Vec<String>,
}

#[derive(Serialize)]
struct StageReport<'a> {
    stage: &'static str,
    dir: &'a str,
    workspace: &'a str,
    terraform_version: Option<String>,
    steps: Vec<StepReport>,
}

#[derive(Serialize)]
struct StepReport {
    kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra_args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terraform_args: Option<Vec<String>>,
}

impl From<&Step> for StepReport {
    fn from(step: &Step) -> Self {
        Self {
            kind: step.name(),
            extra_args: step.extra_args().to_vec(),
            commands: step.commands().to_vec(),
            terraform_args: step.terraform_args(),
        }
    }
}

/// Execute the `plan` or `apply` command.
pub fn execute(kind: StageKind, args: StageArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let default_version = args
        .default_terraform_version
        .as_deref()
        .map(|v| {
            parse_terraform_version(v).map_err(|e| suggestions::invalid_default_version(v, &e))
        })
        .transpose()?;

    let planner = ExecutionPlanner::new(Arc::new(DefaultTerraformExec::new()))
        .with_default_tf_version(default_version);
    let request = StageRequest::new(&args.repo_dir, &args.workspace, &args.dir, &args.user)
        .with_extra_comment_args(args.extra_args.iter().cloned());
    let log = ContextLogger::new(format!("{}#{}", args.dir, args.workspace));

    let stage = match kind {
        StageKind::Plan => planner.build_plan_stage(&log, &request)?,
        StageKind::Apply => planner.build_apply_stage(&log, &request)?,
    };

    match args.format {
        OutputFormat::Json => {
            let report = StageReport {
                stage: stage.kind.as_str(),
                dir: &args.dir,
                workspace: &args.workspace,
                terraform_version: planner.default_tf_version().map(|v| v.to_string()),
                steps: stage.iter().map(StepReport::from).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&out, &stage, &args),
    }

    Ok(())
}

fn print_text(out: &OutputConfig, stage: &Stage, args: &StageArgs) {
    println!(
        "{} {} stage for {} (workspace {}): {} step{}",
        emoji(out, "📋", "[STAGE]"),
        stage.kind,
        args.dir,
        args.workspace,
        stage.len(),
        if stage.len() == 1 { "" } else { "s" }
    );
    for (idx, step) in stage.iter().enumerate() {
        match step.terraform_args() {
            Some(tf_args) => println!(
                "  {}. {} terraform {}",
                idx + 1,
                step_label(out, step.name()),
                tf_args.join(" ")
            ),
            None => {
                println!("  {}. {}", idx + 1, step_label(out, step.name()));
                for command in step.commands() {
                    println!("       $ {command}");
                }
            }
        }
    }
}
