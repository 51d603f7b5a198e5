//! Path manipulation utilities for workflow-planner

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path};

/// Returns true if `dir` contains a `..` segment.
///
/// Only whole segments count: `foo..bar` is a valid directory name, while
/// `../escape` and `a/../../b` are not.
pub fn has_parent_traversal(dir: &str) -> bool {
    Path::new(dir)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Match a path against a glob pattern
///
/// `*` does not cross directory boundaries; use `**` for that.
pub fn glob_match(pattern: &str, path: &str) -> Result<bool> {
    let compiled = Pattern::new(pattern)
        .map_err(|e| Error::validation("pattern", format!("invalid glob {pattern:?}: {e}")))?;
    Ok(compiled.matches_with(path, match_options()))
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Express a repo-relative `file` relative to the project directory `dir`.
///
/// Files outside the project come back with leading `../` segments, which is
/// how autoplan patterns such as `../modules/**/*.tf` reach shared code.
pub fn relative_to_project(dir: &str, file: &str) -> String {
    let dir_parts = normalized_parts(dir);
    let file_parts = normalized_parts(file);

    let common = dir_parts
        .iter()
        .zip(file_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(dir_parts.len() - common));
    parts.extend(file_parts[common..].iter().copied());
    parts.join("/")
}

fn normalized_parts(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}
