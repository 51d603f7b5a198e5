//! # Error Handling
//!
//! This module defines the centralized error type for `workflow-planner`. It
//! uses `thiserror` to describe every failure the configuration layer and the
//! execution planner can surface to a caller.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum covering all failure modes. Each variant
//!   carries enough context (field location, offending value, workflow name)
//!   for the caller to relay a useful message back to the requesting user.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! A missing configuration file is deliberately *not* represented here: the
//! parser reports it as `Ok(None)` and the planner falls back to defaults.
//!
//! The remaining failures fall into four groups:
//!
//! - Validation errors (`Validation`, `InvalidTerraformVersion`,
//!   `UnknownStepType`).
//! - Resolution errors (`UnknownWorkflow`).
//! - Parse errors (`Yaml`, `ConfigParse`), surfaced unmodified.
//! - Collaborator errors (`TerraformCommand`, `Io`).

use thiserror::Error;

/// Main error type for workflow-planner operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file exists but cannot be used at all, for example
    /// because it is empty.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A configuration field failed a structural or semantic rule.
    ///
    /// `field` is the location of the value inside the file, such as
    /// `projects[0].dir`.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A `terraform_version` value is not a semantic version.
    #[error("{field}: version {version:?} could not be parsed: {source}")]
    InvalidTerraformVersion {
        field: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    /// A workflow step uses a type tag other than init, plan, apply or run.
    #[error("{location}: unknown step type {step:?}, expected one of init, plan, apply, run")]
    UnknownStepType { location: String, step: String },

    /// A project names a workflow that the configuration does not define.
    #[error("no workflow with key {name:?} defined{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownWorkflow {
        name: String,
        /// Optional "did you mean" suggestion
        hint: Option<String>,
    },

    /// The terraform binary exited unsuccessfully.
    #[error("terraform command failed: {command} - {stderr}")]
    TerraformCommand { command: String, stderr: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the field location for validation-type errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } | Error::InvalidTerraformVersion { field, .. } => {
                Some(field)
            }
            Error::UnknownStepType { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Re-anchors a validation error under a parent location, so that an
    /// error raised for `dir` inside the second project reads
    /// `projects[1].dir`.
    pub(crate) fn within(self, parent: &str) -> Self {
        let prefix = |inner: String| format!("{parent}.{inner}");
        match self {
            Error::Validation { field, message } => Error::Validation {
                field: prefix(field),
                message,
            },
            Error::InvalidTerraformVersion {
                field,
                version,
                source,
            } => Error::InvalidTerraformVersion {
                field: prefix(field),
                version,
                source,
            },
            Error::UnknownStepType { location, step } => Error::UnknownStepType {
                location: prefix(location),
                step,
            },
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
