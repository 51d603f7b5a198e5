//! Integration tests for the execution planner
//!
//! These tests drive the public library API end to end: a repository
//! checkout on disk, an `atlantis.yaml`, and a planner wired to a recording
//! terraform executor.

use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use workflow_planner::config::ParserValidator;
use workflow_planner::error::{Error, Result};
use workflow_planner::executor::TerraformExec;
use workflow_planner::logging::ContextLogger;
use workflow_planner::planner::{ExecutionPlanner, StageRequest};
use workflow_planner::stage::{StageKind, Step};

/// Records every invocation instead of running terraform.
#[derive(Default)]
struct RecordingExec {
    calls: Mutex<Vec<(PathBuf, Vec<String>, Option<Version>, String)>>,
}

impl TerraformExec for RecordingExec {
    fn run_command_with_version(
        &self,
        _log: &ContextLogger,
        path: &Path,
        args: &[String],
        version: Option<&Version>,
        workspace: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push((
            path.to_path_buf(),
            args.to_vec(),
            version.cloned(),
            workspace.to_string(),
        ));
        Ok(String::new())
    }
}

const REPO_CONFIG: &str = r#"
version: 2
projects:
- name: network
  dir: infra/network
  workflow: guarded
  terraform_version: 0.12.0
  autoplan:
    when_modified: ["*.tf", "../modules/**/*.tf"]
- dir: infra/network
  workspace: prod
  apply_requirements: [approved]
workflows:
  guarded:
    plan:
      steps:
      - run: [./check-fmt.sh, ./check-policy.sh]
      - init
      - plan:
          extra_args: ["-lock=false"]
"#;

fn checkout() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("atlantis.yaml"), REPO_CONFIG).unwrap();
    temp
}

fn run_stage(steps: &[Step]) {
    for step in steps {
        if let Some(args) = step.terraform_args() {
            let meta = step.meta();
            meta.terraform_executor
                .run_command_with_version(
                    &meta.log,
                    &meta.absolute_path,
                    &args,
                    meta.terraform_version.as_ref(),
                    &meta.workspace,
                )
                .unwrap();
        }
    }
}

#[test]
fn test_plan_stage_drives_executor_through_step_meta() {
    let repo = checkout();
    let exec = Arc::new(RecordingExec::default());
    let planner = ExecutionPlanner::new(exec.clone())
        .with_default_tf_version(Some(Version::new(1, 5, 0)));
    let log = ContextLogger::new("infra/network#default");
    let request = StageRequest::new(repo.path(), "default", "infra/network", "carol");

    let stage = planner.build_plan_stage(&log, &request).unwrap();
    assert_eq!(stage.kind, StageKind::Plan);
    assert_eq!(stage.step_names(), vec!["run", "init", "plan"]);
    assert_eq!(
        stage.steps[0].commands(),
        ["./check-fmt.sh", "./check-policy.sh"]
    );

    run_stage(&stage.steps);

    let calls = exec.calls.lock().unwrap();
    assert_eq!(calls.len(), 2, "run steps never reach terraform");
    for (path, _, version, workspace) in calls.iter() {
        assert_eq!(path, &repo.path().join("infra/network"));
        // The project pins 0.12.0, but steps carry the planner-wide version.
        assert_eq!(version, &Some(Version::new(1, 5, 0)));
        assert_eq!(workspace, "default");
    }
    assert_eq!(calls[0].1[0], "init");
    assert!(calls[1].1.contains(&"-lock=false".to_string()));
    assert!(calls[1].1.contains(&"atlantis_user=carol".to_string()));
}

#[test]
fn test_apply_stage_defaults_when_workflow_has_no_apply_section() {
    let repo = checkout();
    let planner = ExecutionPlanner::new(Arc::new(RecordingExec::default()));
    let log = ContextLogger::default();
    let request = StageRequest::new(repo.path(), "default", "infra/network", "carol");

    let stage = planner.build_apply_stage(&log, &request).unwrap();
    assert_eq!(stage.step_names(), vec!["apply"]);
}

#[test]
fn test_second_workspace_resolves_to_its_own_project() {
    let repo = checkout();
    let planner = ExecutionPlanner::new(Arc::new(RecordingExec::default()));
    let log = ContextLogger::default();
    let request = StageRequest::new(repo.path(), "prod", "infra/network", "carol");

    // The prod entry has no workflow, so it plans with the defaults.
    let stage = planner.build_plan_stage(&log, &request).unwrap();
    assert_eq!(stage.step_names(), vec!["init", "plan"]);
    assert_eq!(stage.meta().unwrap().workspace, "prod");
}

#[test]
fn test_validated_config_exposes_project_settings() {
    let repo = checkout();
    let config = ParserValidator::new()
        .read_config(repo.path())
        .unwrap()
        .expect("config should exist");

    let network = config.find_project("infra/network", "default").unwrap();
    assert_eq!(network.name.as_deref(), Some("network"));
    assert_eq!(network.terraform_version, Some(Version::new(0, 12, 0)));
    assert!(network.autoplan_triggered_by(&["infra/network/main.tf"]));
    assert!(network.autoplan_triggered_by(&["infra/modules/vpc/main.tf"]));
    assert!(!network.autoplan_triggered_by(&["docs/README.md"]));

    let prod = config.find_project("infra/network", "prod").unwrap();
    assert_eq!(prod.apply_requirements, vec!["approved"]);
    assert!(prod.autoplan.enabled);
}

#[test]
fn test_planning_is_repeatable() {
    let repo = checkout();
    let planner = ExecutionPlanner::new(Arc::new(RecordingExec::default()));
    let log = ContextLogger::default();
    let request = StageRequest::new(repo.path(), "default", "infra/network", "carol")
        .with_extra_comment_args(["-target=aws_vpc.main"]);

    let first = planner.build_plan_stage(&log, &request).unwrap();
    let second = planner.build_plan_stage(&log, &request).unwrap();

    let args = |stage: &workflow_planner::stage::Stage| -> Vec<Option<Vec<String>>> {
        stage.iter().map(Step::terraform_args).collect()
    };
    assert_eq!(args(&first), args(&second));
}

#[test]
fn test_broken_config_surfaces_error() {
    let repo = TempDir::new().unwrap();
    std::fs::write(
        repo.path().join("atlantis.yaml"),
        "version: 3\nprojects:\n- dir: .\n",
    )
    .unwrap();
    let planner = ExecutionPlanner::new(Arc::new(RecordingExec::default()));
    let request = StageRequest::new(repo.path(), "default", ".", "carol");

    let err = planner
        .build_plan_stage(&ContextLogger::default(), &request)
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}
