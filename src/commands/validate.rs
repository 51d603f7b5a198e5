//! # Validate Command Implementation
//!
//! Checks a repository's `atlantis.yaml` without planning anything.
//!
//! ## Checks
//!
//! - **Parsing and validation**: The same rules the planner applies, so a
//!   file that passes here will not fail planning for structural reasons.
//! - **Workflow references**: Projects naming undefined workflows. The
//!   planner only trips over these when that project is planned, so they
//!   are reported as errors up front.
//! - **Duplicate projects**: Repeated (dir, workspace) pairs. Only the first
//!   entry is ever used, so later ones are reported as warnings.
//!
//! This command is read-only.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use workflow_planner::config::ParserValidator;
use workflow_planner::output::{emoji, OutputConfig};
use workflow_planner::suggestions;

/// Validate the atlantis.yaml of a repository
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Root of the repository checkout
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = ParserValidator::config_path(&args.repo_dir);
    println!(
        "{} Validating configuration: {}",
        emoji(&out, "🔍", "[SCAN]"),
        config_path.display()
    );

    let config = match ParserValidator::new().read_config(&args.repo_dir) {
        Ok(Some(config)) => {
            println!(
                "{} Configuration file parsed successfully",
                emoji(&out, "✅", "[OK]")
            );
            config
        }
        Ok(None) => return Err(suggestions::config_not_found(&config_path)),
        Err(e) => {
            println!(
                "{} Configuration validation failed: {}",
                emoji(&out, "❌", "[ERR]"),
                e
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    println!("\n{} Configuration Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Projects: {}", config.projects.len());
    println!("   Workflows: {}", config.workflows.len());

    let mut errors = 0usize;
    let mut warnings = 0usize;

    for project in config.dangling_workflow_refs() {
        errors += 1;
        let name = project.workflow.as_deref().unwrap_or_default();
        let hint = suggestions::unknown_workflow_hint(name, &config.workflow_names())
            .map(|h| format!(" ({h})"))
            .unwrap_or_default();
        println!(
            "{} Project {} uses undefined workflow {:?}{}",
            emoji(&out, "❌", "[ERR]"),
            project.label(),
            name,
            hint
        );
    }

    for (dir, workspace) in config.duplicate_projects() {
        warnings += 1;
        println!(
            "{} Project with dir {:?} and workspace {:?} is defined more than once; only the first entry is used",
            emoji(&out, "⚠️", "[WARN]"),
            dir,
            workspace
        );
    }

    if errors > 0 {
        anyhow::bail!("Validation failed with {} error(s)", errors);
    }
    if warnings > 0 && args.strict {
        anyhow::bail!(
            "Validation failed with {} warning(s) (strict mode)",
            warnings
        );
    }

    println!(
        "\n{} Configuration is valid{}",
        emoji(&out, "✅", "[OK]"),
        if warnings > 0 {
            format!(" with {warnings} warning(s)")
        } else {
            String::new()
        }
    );
    Ok(())
}
