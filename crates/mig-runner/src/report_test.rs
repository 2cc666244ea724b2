use super::*;

#[test]
fn test_empty_report_summary() {
    let report = MigrationReport::default();
    assert_eq!(report.count(), 0);
    assert_eq!(report.last_completed(), None);
    assert!(report.is_clean());
    assert_eq!(report.summary(), "No migrations performed");
}

#[test]
fn test_report_summary_names_last_completed() {
    let report = MigrationReport {
        applied: vec![
            "scripts/00000000000000000001_init.sql".to_string(),
            "scripts/00000000000000000002_users.sql".to_string(),
        ],
        ..Default::default()
    };
    assert_eq!(
        report.summary(),
        "2 migrations completed. Last completed: scripts/00000000000000000002_users.sql"
    );
}

#[test]
fn test_report_not_clean_when_halted_or_unrecorded() {
    let halted = MigrationReport {
        halt: Some(HaltReason::InvalidName {
            script: "scripts/bad.sql".to_string(),
        }),
        ..Default::default()
    };
    assert!(!halted.is_clean());

    let unrecorded = MigrationReport {
        applied: vec!["scripts/00000000000000000001_init.sql".to_string()],
        unrecorded: vec!["scripts/00000000000000000001_init.sql".to_string()],
        ..Default::default()
    };
    assert!(!unrecorded.is_clean());
}

#[test]
fn test_halt_reason_script() {
    let exec = HaltReason::Execution {
        script: "scripts/00000000000000000002_users.sql".to_string(),
        message: "boom".to_string(),
    };
    assert_eq!(exec.script(), Some("scripts/00000000000000000002_users.sql"));
    assert!(exec.to_string().contains("rolled back"));

    let discovery = HaltReason::Discovery {
        message: "bad pattern".to_string(),
    };
    assert_eq!(discovery.script(), None);
}

#[test]
fn test_halt_reason_serializes_with_kind_tag() {
    let halt = HaltReason::InvalidName {
        script: "scripts/bad.sql".to_string(),
    };
    let json = serde_json::to_value(&halt).unwrap();
    assert_eq!(json["kind"], "invalid_name");
    assert_eq!(json["script"], "scripts/bad.sql");
}

#[test]
fn test_plan_queries() {
    let plan = MigrationPlan {
        last_applied: Some("scripts/00000000000000000001_init.sql".to_string()),
        entries: vec![
            PlanEntry {
                script: "scripts/00000000000000000001_init.sql".to_string(),
                state: ScriptState::Applied,
            },
            PlanEntry {
                script: "scripts/00000000000000000002_users.sql".to_string(),
                state: ScriptState::Pending,
            },
            PlanEntry {
                script: "scripts/3_bad.sql".to_string(),
                state: ScriptState::InvalidName,
            },
            PlanEntry {
                script: "scripts/00000000000000000004_orders.sql".to_string(),
                state: ScriptState::Blocked,
            },
        ],
    };

    assert_eq!(plan.pending(), vec!["scripts/00000000000000000002_users.sql"]);
    assert_eq!(plan.invalid_name(), Some("scripts/3_bad.sql"));
    assert_eq!(plan.count(ScriptState::Applied), 1);
    assert_eq!(plan.count(ScriptState::Blocked), 1);
}
