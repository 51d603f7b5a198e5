//! # Terraform Command Execution
//!
//! The planner never runs anything itself, but every step it produces holds
//! a handle to the component that eventually will. That component is
//! described by the [`TerraformExec`] trait so that it can be swapped out,
//! which is particularly useful for testing.
//!
//! [`DefaultTerraformExec`] is the production implementation. It runs the
//! `terraform` binary as a child process, choosing a version-suffixed binary
//! (`terraform0.11.7`) when a version is pinned.

use crate::error::{Error, Result};
use crate::logging::ContextLogger;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for running terraform - allows mocking in tests
pub trait TerraformExec: Send + Sync {
    /// Run terraform in `path` with `args`, selecting the workspace, and
    /// return its captured standard output.
    fn run_command_with_version(
        &self,
        log: &ContextLogger,
        path: &Path,
        args: &[String],
        version: Option<&Version>,
        workspace: &str,
    ) -> Result<String>;
}

/// Runs the system terraform binary.
#[derive(Debug, Clone)]
pub struct DefaultTerraformExec {
    binary: PathBuf,
}

impl DefaultTerraformExec {
    pub fn new() -> Self {
        Self::with_binary("terraform")
    }

    /// Use a specific binary name or path instead of `terraform`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The binary to invoke for `version`.
    ///
    /// Pinned versions are expected to be installed side by side with the
    /// version appended to the binary name.
    pub fn binary_for(&self, version: Option<&Version>) -> PathBuf {
        match version {
            Some(v) => {
                let mut name = self.binary.clone().into_os_string();
                name.push(v.to_string());
                PathBuf::from(name)
            }
            None => self.binary.clone(),
        }
    }
}

impl Default for DefaultTerraformExec {
    fn default() -> Self {
        Self::new()
    }
}

impl TerraformExec for DefaultTerraformExec {
    fn run_command_with_version(
        &self,
        log: &ContextLogger,
        path: &Path,
        args: &[String],
        version: Option<&Version>,
        workspace: &str,
    ) -> Result<String> {
        let binary = self.binary_for(version);
        let command = format!("{} {}", binary.display(), args.join(" "));
        log.debug(format_args!("running {:?} in {}", command, path.display()));

        let output = Command::new(&binary)
            .args(args)
            .current_dir(path)
            .env("TF_WORKSPACE", workspace)
            .env("TF_IN_AUTOMATION", "true")
            .output()
            .map_err(|e| Error::TerraformCommand {
                command: command.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::TerraformCommand {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
