//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use workflow_planner::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use crate::defaults::CONFIG_FILENAME;
use std::path::Path;

/// Generate an error for when `validate` finds no configuration file.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Without {CONFIG_FILENAME}, every project runs the default init/plan/apply steps\n\
         hint: Use --repo-dir to point at a different repository checkout",
        path = path.display()
    )
}

/// Generate an error for an unparseable `--default-terraform-version`.
pub fn invalid_default_version(version: &str, error: &semver::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid default terraform version: {version}\n\
         error: {error}\n\n\
         hint: Use a full semantic version such as '0.11.7' or '1.5.0'\n\
         hint: Leave the flag unset to run whichever terraform is on PATH"
    )
}

/// Build the "did you mean" hint for a workflow name that is not defined.
///
/// Returns `None` when nothing defined is close enough to be a likely typo.
pub fn unknown_workflow_hint(name: &str, defined: &[&str]) -> Option<String> {
    if let Some(similar) = find_similar(name, defined) {
        return Some(format!("Did you mean '{similar}'?"));
    }
    if defined.is_empty() {
        return Some(format!(
            "{CONFIG_FILENAME} defines no workflows; add one under `workflows:`"
        ));
    }
    None
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Two rolling rows are enough.
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let path = Path::new("/some/repo/atlantis.yaml");
        let message = config_not_found(path).to_string();

        assert!(message.contains("Configuration file not found"));
        assert!(message.contains("/some/repo/atlantis.yaml"));
        assert!(message.contains("hint:"));
        assert!(message.contains("--repo-dir"));
    }

    #[test]
    fn test_invalid_default_version_includes_hints() {
        let error = semver::Version::parse("0.11").unwrap_err();
        let message = invalid_default_version("0.11", &error).to_string();

        assert!(message.contains("Invalid default terraform version: 0.11"));
        assert!(message.contains("hint: Use a full semantic version"));
    }

    #[test]
    fn test_unknown_workflow_suggests_similar() {
        let hint = unknown_workflow_hint("custm", &["custom", "staging"]);
        assert_eq!(hint.as_deref(), Some("Did you mean 'custom'?"));
    }

    #[test]
    fn test_unknown_workflow_no_suggestion_for_very_different() {
        assert_eq!(unknown_workflow_hint("zzzzzz", &["custom"]), None);
    }

    #[test]
    fn test_unknown_workflow_with_no_workflows() {
        let hint = unknown_workflow_hint("custom", &[]).unwrap();
        assert!(hint.contains("defines no workflows"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("custom", "custom"), 0);
        assert_eq!(edit_distance("custm", "custom"), 1);
        assert_eq!(edit_distance("cutsom", "custom"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar() {
        let candidates = ["staging", "production", "custom"];

        assert_eq!(find_similar("stagin", &candidates), Some("staging"));
        assert_eq!(find_similar("prodution", &candidates), Some("production"));
        assert_eq!(find_similar("foobar", &candidates), None);
    }
}
