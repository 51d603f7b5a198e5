//! Leveled logging handle passed into the planner and carried by every step.
//!
//! Output goes through the `log` facade; the binary installs `env_logger`.
//! The handle only adds a source label so that lines belonging to one
//! request (for example `owner/repo#12`) can be told apart.

use std::fmt;

/// Target used for every record emitted through a [`ContextLogger`].
pub const LOG_TARGET: &str = "workflow_planner";

/// A cloneable logger labelled with the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLogger {
    source: String,
}

impl ContextLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: LOG_TARGET, "{}: {}", self.source, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        log::info!(target: LOG_TARGET, "{}: {}", self.source, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!(target: LOG_TARGET, "{}: {}", self.source, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        log::error!(target: LOG_TARGET, "{}: {}", self.source, args);
    }
}

impl Default for ContextLogger {
    fn default() -> Self {
        Self::new("workflow-planner")
    }
}
