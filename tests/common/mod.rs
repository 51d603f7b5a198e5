//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and configuration snippets
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::CUSTOM_WORKFLOW);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common atlantis.yaml snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// One project with no workflow; planning falls back to defaults.
    pub const SINGLE_PROJECT: &str = r#"
version: 2
projects:
- dir: infra
"#;

    /// A project wired to a custom workflow with run steps.
    pub const CUSTOM_WORKFLOW: &str = r#"
version: 2
projects:
- name: web
  dir: infra/web
  workspace: staging
  workflow: custom
  terraform_version: v0.11.7
workflows:
  custom:
    plan:
      steps:
      - run: echo hi
      - init:
          extra_args: ["-upgrade"]
      - plan
    apply:
      steps:
      - run: ./notify.sh
      - apply
"#;

    /// A project whose workflow key is never defined.
    pub const DANGLING_WORKFLOW: &str = r#"
version: 2
projects:
- dir: infra
  workflow: custmo
workflows:
  custom:
    plan:
      steps: [plan]
"#;

    /// Two entries for the same (dir, workspace) pair.
    pub const DUPLICATE_PROJECT: &str = r#"
version: 2
projects:
- name: first
  dir: infra
- name: second
  dir: infra
"#;

    /// Parses as YAML but fails validation.
    pub const PARENT_TRAVERSAL: &str = r#"
version: 2
projects:
- dir: ../outside
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "projects: [unclosed";
}

/// A test fixture that provides a temporary repository checkout.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config(configs::SINGLE_PROJECT)
///     .with_file("infra/main.tf", "");
///
/// fixture.command().arg("plan").arg("--dir").arg("infra").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add an `atlantis.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("atlantis.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("atlantis.yaml")
    }

    /// Create a command with `--repo-dir` pointing at this fixture.
    ///
    /// `subcommand` comes first so its own flags parse correctly. The
    /// `USER` and default version environment variables are cleared so
    /// results do not depend on the machine running the tests.
    #[allow(dead_code)]
    pub fn command(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("workflow-planner");
        cmd.env_remove("USER")
            .env_remove("WORKFLOW_PLANNER_TF_VERSION")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg(subcommand)
            .arg("--repo-dir")
            .arg(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::SINGLE_PROJECT);
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        let configs = [
            configs::SINGLE_PROJECT,
            configs::CUSTOM_WORKFLOW,
            configs::DANGLING_WORKFLOW,
            configs::DUPLICATE_PROJECT,
            configs::PARENT_TRAVERSAL,
        ];

        for config in configs {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
