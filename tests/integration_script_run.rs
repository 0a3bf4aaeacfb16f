use planedit::config::Config;
use planedit::script;

#[test]
fn yaml_script_runs_end_to_end() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("edits.yaml");
    std::fs::write(
        &path,
        r#"
resources:
  - "John Doe"
steps:
  - create-task: {}
  - set: {task: 0, property: Name, value: "Task name"}
  - commit: {name: "Create task"}
  - set: {task: 0, property: Allocation, value: "John Doe"}
  - set: {task: 0, property: StartupCost, value: "$ 1,000.00"}
  - commit: {name: ""}
  - set: {task: 0, property: Risk, value: High}
  - revert
  - show: {task: 0, property: Risk}
"#,
    )
    .expect("write script");

    let s = script::load(&path).expect("load");
    let report = script::run(&s, Config::default()).expect("run");
    assert_eq!(report.failed, 0, "{:?}", report.steps);

    // The risk edit was reverted; the committed edits survived.
    let show = report.steps.last().expect("steps");
    assert_eq!(show.detail, "Risk = Low");

    let task = &report.tasks[0];
    let prop = |name: &str| {
        task.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.clone())
            .unwrap_or_default()
    };
    assert_eq!(prop("Name"), "Task name");
    assert_eq!(prop("Allocation"), "John Doe");
    assert_eq!(prop("StartupCost"), "$ 1,000.00");
    assert_eq!(prop("Risk"), "Low");
}

#[test]
fn missing_script_file_reports_the_path() {
    let err = script::load(std::path::Path::new("/no/such/edits.yaml"))
        .expect_err("should fail");
    assert!(err.to_string().contains("edits.yaml"));
}
