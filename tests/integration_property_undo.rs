use planedit::config::Config;
use planedit::core::value::{ConstraintType, Role, Value};
use planedit::project::Project;
use time::macros::datetime;

fn project() -> Project {
    Project::new(Config::default()).expect("project")
}

/// Every observed property: set it, read it back under the role the input
/// targets, revert, and check the pre-edit value is restored.
#[test]
fn each_property_sets_and_reverts() {
    let mut p = project();
    let t = p.create_task(0);
    p.add_resource("John Doe");
    p.add_command("Create task");

    let cases: &[(&str, &str, Role)] = &[
        ("Name", "Task name", Role::Edit),
        ("Responsible", "Task responsible", Role::Edit),
        ("Allocation", "John Doe", Role::Display),
        ("Estimate", "3.0h", Role::Display),
        ("EstimateType", "Duration", Role::Display),
        ("Constraint", "ALAP", Role::Edit),
        ("ConstraintStart", "2011-08-01T10:00:00", Role::Display),
        ("ConstraintEnd", "2011-08-01T11:00:00", Role::Display),
        ("OptimisticRatio", "-20", Role::Edit),
        ("PessimisticRatio", "120", Role::Edit),
        ("Risk", "Low", Role::Edit),
        ("StartupCost", "$ 1,000.00", Role::Display),
        ("ShutdownCost", "1000.00", Role::Edit),
        ("Description", "Task description", Role::Edit),
    ];

    for (property, input, role) in cases {
        let before = p.data(&t, property).expect(property);

        assert!(
            p.set_data(&t, property, input),
            "failed to set {property} to {input}"
        );
        let shown = p.data_role(&t, property, *role).expect(property);
        assert_eq!(
            p.value_text(&shown),
            *input,
            "read-back mismatch for {property}"
        );

        p.revert_command();
        assert_eq!(
            p.data(&t, property).expect(property),
            before,
            "revert did not restore {property}"
        );
    }
}

#[test]
fn edit_role_returns_typed_values() {
    let mut p = project();
    let t = p.create_task(0);

    assert!(p.set_data(&t, "ConstraintStart", "2011-08-01T10:00:00"));
    assert_eq!(
        p.data_role(&t, "ConstraintStart", Role::Edit).expect("data"),
        Value::DateTime(datetime!(2011-08-01 10:00:00))
    );

    assert!(p.set_data(&t, "ShutdownCost", "1000.00"));
    assert_eq!(
        p.data_role(&t, "ShutdownCost", Role::Edit).expect("data"),
        Value::Money(100_000)
    );

    assert!(p.set_data(&t, "OptimisticRatio", "-20"));
    assert_eq!(
        p.data_role(&t, "OptimisticRatio", Role::Edit).expect("data"),
        Value::Percent(-20)
    );
}

/// The literal command-boundary scenario: a named commit, then an
/// uncommitted edit, then one revert. Only the uncommitted edit goes.
#[test]
fn revert_respects_commit_boundaries() {
    let mut p = project();
    let t = p.create_task(0);

    assert!(p.set_data(&t, "Constraint", "FixedInterval"));
    assert_eq!(
        p.data_role(&t, "Constraint", Role::Edit).expect("data"),
        Value::Text("FixedInterval".to_owned())
    );
    p.add_command("Set permanent");

    let before = p.data(&t, "ConstraintStart").expect("data");
    assert!(p.set_data(&t, "ConstraintStart", "2011-08-01T10:00:00"));
    assert_eq!(
        p.data_role(&t, "ConstraintStart", Role::Edit).expect("data"),
        Value::DateTime(datetime!(2011-08-01 10:00:00))
    );

    p.revert_command();
    assert_eq!(p.data(&t, "ConstraintStart").expect("data"), before);
    assert_eq!(
        p.data_role(&t, "Constraint", Role::Raw).expect("data"),
        Value::Constraint(ConstraintType::FixedInterval)
    );

    // A second revert now takes out the committed constraint change.
    p.revert_command();
    assert_eq!(
        p.data_role(&t, "Constraint", Role::Raw).expect("data"),
        Value::Constraint(ConstraintType::AsSoonAsPossible)
    );
}

#[test]
fn anonymous_commits_are_discrete_undo_units() {
    let mut p = project();
    let t = p.create_task(0);

    assert!(p.set_data(&t, "Constraint", "ASAP"));
    p.add_command("Set permanent");

    assert!(p.set_data(&t, "Estimate", "3.0d"));
    assert_eq!(
        p.data_role(&t, "Estimate", Role::Display).expect("data"),
        Value::Text("3.0d".to_owned())
    );
    p.add_command("");

    let before = p.data(&t, "Risk").expect("data");
    assert!(p.set_data(&t, "Risk", "Low"));
    p.revert_command();
    assert_eq!(p.data(&t, "Risk").expect("data"), before);

    // The anonymous unit still holds exactly the estimate edit.
    p.revert_command();
    assert_eq!(
        p.data_role(&t, "Estimate", Role::Display).expect("data"),
        Value::Text("1.0d".to_owned())
    );
}

#[test]
fn unknown_property_fails_without_side_effects() {
    let mut p = project();
    let t = p.create_task(0);

    let snapshot: Vec<(String, Value)> = p
        .registry()
        .iter()
        .map(|d| (d.name.to_owned(), p.data(&t, d.name).expect(d.name)))
        .collect();

    assert!(!p.set_data(&t, "NoSuchProp", "x"));

    for (name, before) in snapshot {
        assert_eq!(p.data(&t, &name).expect(&name), before);
    }
}

#[test]
fn history_limit_bounds_undo_depth() {
    let mut cfg = Config::default();
    cfg.undo.history_limit = 2;
    let mut p = Project::new(cfg).expect("project");
    let t = p.create_task(0);

    for name in ["a", "b", "c"] {
        assert!(p.set_data(&t, "Name", name));
        p.add_command(name);
    }
    assert_eq!(p.undo_depth(), 2);

    p.revert_command();
    p.revert_command();
    p.revert_command();
    // The first commit fell off the bounded history, so "a" survives.
    assert_eq!(p.data(&t, "Name").expect("data"), Value::Text("a".to_owned()));
}
