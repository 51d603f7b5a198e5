//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the `atlantis.yaml`
//! configuration file and the logic for turning it into something the
//! planner can trust.
//!
//! ## Layers
//!
//! - **`raw`**: The file exactly as written. Every optional field is an
//!   `Option`, unknown keys are rejected at parse time.
//! - **`valid`**: The canonical form produced by `RawConfig::to_valid` once
//!   `RawConfig::validate` has passed. All defaults are resolved here.
//!
//! ## Reading
//!
//! [`ParserValidator::read_config`] is the main entry point. It looks for
//! `atlantis.yaml` at a repository root and runs parse, validate and
//! normalize in that order. A missing file is not an error: it comes back
//! as `Ok(None)` so callers can fall back to default behavior.
//!
//! ```
//! use workflow_planner::config::ParserValidator;
//!
//! let config = ParserValidator::new()
//!     .parse_and_validate("projects:\n  - dir: infra\n")
//!     .unwrap();
//! assert_eq!(config.projects[0].workspace, "default");
//! ```

pub mod raw;
pub mod valid;

pub use raw::{
    parse_terraform_version, RawAutoplan, RawConfig, RawProject, RawStage, RawStep, RawWorkflow,
};
pub use valid::{Autoplan, Config, Project, StepConfig, Workflow};

use crate::defaults::CONFIG_FILENAME;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads, validates and normalizes repository configuration files.
///
/// Holds no state; every call reads the file fresh from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserValidator;

impl ParserValidator {
    pub fn new() -> Self {
        Self
    }

    /// Path of the configuration file for a repository checkout.
    pub fn config_path(repo_dir: &Path) -> PathBuf {
        repo_dir.join(CONFIG_FILENAME)
    }

    /// Read the configuration at the root of `repo_dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other read
    /// failure, parse failure or validation failure is returned unchanged.
    pub fn read_config(&self, repo_dir: &Path) -> Result<Option<Config>> {
        let path = Self::config_path(repo_dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        self.parse_and_validate(&content).map(Some)
    }

    /// Parse, validate and normalize configuration text.
    pub fn parse_and_validate(&self, content: &str) -> Result<Config> {
        if content.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: format!("file {CONFIG_FILENAME} was empty"),
                hint: Some(format!(
                    "Delete {CONFIG_FILENAME} to use the default workflow, or add a `projects:` list"
                )),
            });
        }
        let raw = raw::parse(content)?;
        raw.validate()?;
        Ok(raw.to_valid())
    }
}
