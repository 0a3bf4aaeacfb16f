#![forbid(unsafe_code)]

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::value::Role;
use crate::error::PlaneditError;
use crate::project::Project;
use crate::task::model::TaskId;

/// An edit-script: resources to register up front, then steps executed in
/// order against a fresh project. Tasks are referred to by creation index.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// `- create-task: {}`, with an optional outline position.
    CreateTask {
        #[serde(default)]
        position: usize,
    },
    /// `- set: {task: 0, property: Name, value: "Task name"}`
    Set {
        task: usize,
        property: String,
        value: String,
    },
    /// `- commit: {name: "Set permanent"}`; an empty name is legal.
    Commit {
        #[serde(default)]
        name: String,
    },
    /// `- revert`
    Revert,
    /// `- show: {task: 0, property: Estimate, role: display}`
    Show {
        task: usize,
        property: String,
        #[serde(default)]
        role: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: &'static str,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub id: String,
    pub properties: Vec<PropertyReport>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub tasks: Vec<TaskReport>,
    pub failed: usize,
}

pub fn load(path: &Path) -> Result<Script, PlaneditError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PlaneditError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw)
        .map_err(|e| PlaneditError::Script(format!("failed to parse {}: {e}", path.display())))
}

/// Executes every step, collecting outcomes. A failed step is reported
/// and the run continues, mirroring the boolean `set_data` contract.
pub fn run(script: &Script, config: Config) -> Result<RunReport, PlaneditError> {
    let mut project = Project::new(config)?;
    for name in &script.resources {
        project.add_resource(name);
    }

    let mut tasks: Vec<TaskId> = Vec::new();
    let mut report = RunReport::default();

    for (i, step) in script.steps.iter().enumerate() {
        let (action, ok, detail) = match step {
            Step::CreateTask { position } => {
                let id = project.create_task(*position);
                tasks.push(id.clone());
                (
                    "create-task",
                    true,
                    format!("task {} -> {id}", tasks.len() - 1),
                )
            }
            Step::Set {
                task,
                property,
                value,
            } => match task_at(&tasks, *task) {
                Ok(id) => match project.try_set_data(&id, property, value) {
                    Ok(()) => ("set", true, format!("{property} = {value}")),
                    Err(e) => ("set", false, e.to_string()),
                },
                Err(msg) => ("set", false, msg),
            },
            Step::Commit { name } => {
                project.add_command(name);
                ("commit", true, name.clone())
            }
            Step::Revert => {
                project.revert_command();
                ("revert", true, String::new())
            }
            Step::Show {
                task,
                property,
                role,
            } => match task_at(&tasks, *task) {
                Ok(id) => {
                    let (ok, detail) = show(&project, &id, property, role.as_deref());
                    ("show", ok, detail)
                }
                Err(msg) => ("show", false, msg),
            },
        };
        if !ok {
            report.failed += 1;
        }
        report.steps.push(StepReport {
            step: i,
            action,
            ok,
            detail,
        });
    }

    for task in project.tasks().iter() {
        let mut properties = Vec::new();
        for def in project.registry().iter() {
            properties.push(PropertyReport {
                name: def.name.to_owned(),
                value: project.display(&task.id, def.name).unwrap_or_default(),
            });
        }
        report.tasks.push(TaskReport {
            id: task.id.to_string(),
            properties,
        });
    }

    Ok(report)
}

fn show(project: &Project, id: &TaskId, property: &str, role: Option<&str>) -> (bool, String) {
    let role = match role {
        None => Role::Edit,
        Some(label) => match Role::from_label(label) {
            Some(r) => r,
            None => return (false, format!("unknown role '{label}'")),
        },
    };
    match project.data_role(id, property, role) {
        Ok(v) => (true, format!("{property} = {}", project.value_text(&v))),
        Err(e) => (false, e.to_string()),
    }
}

fn task_at(tasks: &[TaskId], index: usize) -> Result<TaskId, String> {
    tasks
        .get(index)
        .cloned()
        .ok_or_else(|| format!("no task with index {index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_parse_from_yaml() {
        let yaml = r#"
resources:
  - "John Doe"
steps:
  - create-task: {}
  - set: {task: 0, property: Name, value: "Task name"}
  - commit: {name: "Create task"}
  - set: {task: 0, property: Allocation, value: "John Doe"}
  - show: {task: 0, property: Allocation, role: display}
  - revert
"#;
        let script: Script = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(script.resources, vec!["John Doe".to_owned()]);
        assert_eq!(script.steps.len(), 6);
        assert!(matches!(script.steps[5], Step::Revert));
    }

    #[test]
    fn run_executes_the_constraint_scenario() {
        let yaml = r#"
steps:
  - create-task: {}
  - set: {task: 0, property: Constraint, value: FixedInterval}
  - commit: {name: "Set permanent"}
  - set: {task: 0, property: ConstraintStart, value: "2011-08-01T10:00:00"}
  - revert
  - show: {task: 0, property: Constraint}
"#;
        let script: Script = serde_yaml::from_str(yaml).unwrap();
        let report = run(&script, Config::default()).unwrap();
        assert_eq!(report.failed, 0, "{:?}", report.steps);

        // The revert undid the window edit, not the committed constraint.
        let show = report.steps.last().unwrap();
        assert_eq!(show.detail, "Constraint = FixedInterval");
        let task = &report.tasks[0];
        let start = task
            .properties
            .iter()
            .find(|p| p.name == "ConstraintStart")
            .unwrap();
        assert_eq!(start.value, "1970-01-01T00:00:00");
    }

    #[test]
    fn failed_steps_are_reported_and_do_not_abort() {
        let yaml = r#"
steps:
  - create-task: {}
  - set: {task: 0, property: NoSuchProp, value: x}
  - set: {task: 0, property: Risk, value: Medium}
  - set: {task: 1, property: Name, value: y}
"#;
        let script: Script = serde_yaml::from_str(yaml).unwrap();
        let report = run(&script, Config::default()).unwrap();
        assert_eq!(report.failed, 2);
        let risk = report.tasks[0]
            .properties
            .iter()
            .find(|p| p.name == "Risk")
            .unwrap();
        assert_eq!(risk.value, "Medium");
    }
}
