//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{glob_match, has_parent_traversal, relative_to_project};
    use proptest::prelude::*;

    /// A path segment that is never `.` or `..`
    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_.-]{0,8}"
    }

    fn segments(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(segment(), 0..max)
    }

    /// Walk `relative` starting from `base`, popping on `..`.
    fn resolve(base: &[String], relative: &str) -> Vec<String> {
        let mut parts: Vec<String> = base.to_vec();
        for part in relative.split('/').filter(|p| !p.is_empty()) {
            if part == ".." {
                parts.pop();
            } else {
                parts.push(part.to_string());
            }
        }
        parts
    }

    // ============================================================================
    // has_parent_traversal property tests
    // ============================================================================

    proptest! {
        /// Property: paths built from ordinary segments never traverse upward
        #[test]
        fn plain_segments_never_traverse(parts in segments(6)) {
            let dir = parts.join("/");
            prop_assert!(!has_parent_traversal(&dir), "{:?} flagged as traversal", dir);
        }

        /// Property: a `..` segment anywhere is always detected
        #[test]
        fn parent_segment_always_detected(parts in segments(6), pos in 0usize..7) {
            let mut parts = parts;
            let pos = pos.min(parts.len());
            parts.insert(pos, "..".to_string());
            let dir = parts.join("/");
            prop_assert!(has_parent_traversal(&dir), "{:?} not flagged", dir);
        }

        /// Property: dots inside a segment are not traversal
        #[test]
        fn embedded_dots_are_not_traversal(prefix in "[a-z]{1,5}", suffix in "[a-z]{1,5}") {
            let dir = format!("{prefix}..{suffix}");
            prop_assert!(!has_parent_traversal(&dir));
        }
    }

    // ============================================================================
    // relative_to_project property tests
    // ============================================================================

    proptest! {
        /// Property: a file inside the project loses exactly the project prefix
        #[test]
        fn file_inside_project_strips_prefix(dir in segments(4), file in prop::collection::vec(segment(), 1..4)) {
            let dir_str = dir.join("/");
            let file_str = file.join("/");
            let full = if dir_str.is_empty() {
                file_str.clone()
            } else {
                format!("{dir_str}/{file_str}")
            };
            prop_assert_eq!(relative_to_project(&dir_str, &full), file_str);
        }

        /// Property: resolving the result from the project dir gives back the file
        #[test]
        fn relative_path_resolves_back_to_file(dir in segments(4), file in segments(4)) {
            let relative = relative_to_project(&dir.join("/"), &file.join("/"));
            prop_assert_eq!(resolve(&dir, &relative), file);
        }

        /// Property: "." as the project dir leaves the file unchanged
        #[test]
        fn root_project_is_identity(file in prop::collection::vec(segment(), 1..5)) {
            let file_str = file.join("/");
            prop_assert_eq!(relative_to_project(".", &file_str), file_str);
        }

        /// Property: results never contain empty segments
        #[test]
        fn relative_path_has_no_empty_segments(dir in segments(4), file in segments(4)) {
            let relative = relative_to_project(&dir.join("/"), &file.join("/"));
            prop_assert!(!relative.contains("//"));
            prop_assert!(!relative.starts_with('/'));
            prop_assert!(!relative.ends_with('/'));
        }
    }

    // ============================================================================
    // glob_match property tests
    // ============================================================================

    proptest! {
        /// Property: a literal alphanumeric path matches itself
        #[test]
        fn literal_pattern_matches_itself(parts in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
            let path = parts.join("/");
            prop_assert!(glob_match(&path, &path).unwrap());
        }

        /// Property: `**/*.tf` matches any nested terraform file
        #[test]
        fn double_star_matches_nested_tf_files(dirs in prop::collection::vec("[a-z0-9]{1,8}", 1..4), name in "[a-z0-9]{1,8}") {
            let path = format!("{}/{}.tf", dirs.join("/"), name);
            prop_assert!(glob_match("**/*.tf", &path).unwrap());
        }

        /// Property: a single `*` never crosses a directory boundary
        #[test]
        fn single_star_stays_in_directory(dirs in prop::collection::vec("[a-z0-9]{1,8}", 1..4), name in "[a-z0-9]{1,8}") {
            let path = format!("{}/{}.tf", dirs.join("/"), name);
            prop_assert!(!glob_match("*.tf", &path).unwrap());
        }

        /// Property: matching is deterministic
        #[test]
        fn glob_match_is_deterministic(pattern in "[a-z*?/]{1,10}", path in "[a-z/]{0,12}") {
            let first = glob_match(&pattern, &path);
            let second = glob_match(&pattern, &path);
            prop_assert_eq!(first.is_ok(), second.is_ok());
            if let (Ok(a), Ok(b)) = (first, second) {
                prop_assert_eq!(a, b);
            }
        }
    }
}
