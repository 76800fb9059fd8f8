use kbmacro::actions::{load_sequence, validate, Action, ActionKind, ValidationError};
use tempfile::tempdir;

#[test]
fn accepts_mixed_sequence() {
    let sequence = vec![
        Action::key("w", 0.1, 0.2),
        Action::mouse("left", 0.0, 0.05),
        Action::wait(1.5),
        Action::key("enter", 0.0, 0.0),
    ];
    assert!(validate(&sequence).is_ok());
}

#[test]
fn rejects_empty_sequence() {
    assert_eq!(validate(&[]), Err(ValidationError::EmptySequence));
}

#[test]
fn rejects_unknown_key_name() {
    // Modifiers are not playable keys on their own.
    let sequence = vec![
        Action::key("a", 0.0, 0.0),
        Action::key("shift", 0.0, 0.0),
    ];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::UnknownActionName {
            index: 1,
            name: "shift".into(),
        })
    );
}

#[test]
fn rejects_unknown_mouse_button() {
    let sequence = vec![Action::mouse("side", 0.0, 0.0)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::UnknownActionName {
            index: 0,
            name: "side".into(),
        })
    );
}

#[test]
fn rejects_negative_hold() {
    let sequence = vec![Action::key("a", -0.1, 0.0)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::NegativeDuration { index: 0 })
    );
}

#[test]
fn rejects_negative_wait() {
    let sequence = vec![Action::key("a", 0.0, 0.0), Action::wait(-2.0)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::NegativeDuration { index: 1 })
    );
}

#[test]
fn rejects_non_finite_durations() {
    let sequence = vec![Action::wait(f64::NAN)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::NegativeDuration { index: 0 })
    );
    let sequence = vec![Action::key("a", f64::INFINITY, 0.0)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::NegativeDuration { index: 0 })
    );
}

#[test]
fn reports_first_failing_action() {
    let sequence = vec![
        Action::key("bogus", 0.0, 0.0),
        Action::key("a", -1.0, 0.0),
    ];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::UnknownActionName {
            index: 0,
            name: "bogus".into(),
        })
    );
}

#[test]
fn duration_checked_before_name() {
    let sequence = vec![Action::key("bogus", -1.0, 0.0)];
    assert_eq!(
        validate(&sequence),
        Err(ValidationError::NegativeDuration { index: 0 })
    );
}

#[test]
fn wait_actions_need_no_name() {
    assert!(validate(&[Action::wait(0.5)]).is_ok());
}

#[test]
fn documented_json_shape_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("combo.json");
    std::fs::write(
        &path,
        r#"[
            {"type": "key", "value": "w", "hold": 0.1, "wait": 0.2},
            {"type": "mouse", "value": "left", "wait": 0.05},
            {"type": "wait", "wait": 1.5}
        ]"#,
    )
    .unwrap();

    let sequence = load_sequence(path.to_str().unwrap()).expect("should load");
    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence[0].kind, ActionKind::Key);
    assert_eq!(sequence[0].name, "w");
    assert_eq!(sequence[0].hold, 0.1);
    assert_eq!(sequence[0].wait, 0.2);
    assert_eq!(sequence[1].kind, ActionKind::Mouse);
    assert_eq!(sequence[1].hold, 0.0);
    assert_eq!(sequence[2].kind, ActionKind::Wait);
    assert_eq!(sequence[2].wait, 1.5);
    assert!(validate(&sequence).is_ok());
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(load_sequence(path.to_str().unwrap()).is_err());
}
