use kbmacro::actions::Action;
use kbmacro::store::{MacroStore, StoreError, MAX_MACROS};
use tempfile::tempdir;

fn sample_sequence() -> Vec<Action> {
    vec![
        Action::key("w", 0.1, 0.2),
        Action::mouse("left", 0.0, 0.05),
        Action::wait(1.5),
    ]
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    let sequence = sample_sequence();
    store.save("combo", &sequence).expect("should save");
    let loaded = store.load("combo").expect("should load");
    assert_eq!(loaded, sequence);
}

#[test]
fn names_are_sorted_and_missing_dir_reads_empty() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    assert!(store.names().expect("missing dir is fine").is_empty());

    store.save("bravo", &sample_sequence()).unwrap();
    store.save("alpha", &sample_sequence()).unwrap();
    assert_eq!(store.names().unwrap(), vec!["alpha", "bravo"]);
}

#[test]
fn sixth_name_is_rejected() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    for i in 0..MAX_MACROS {
        store.save(&format!("macro{i}"), &sample_sequence()).unwrap();
    }
    assert!(matches!(
        store.save("one-too-many", &sample_sequence()),
        Err(StoreError::LimitReached)
    ));
    assert_eq!(store.names().unwrap().len(), MAX_MACROS);
}

#[test]
fn overwriting_at_the_limit_is_allowed() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    for i in 0..MAX_MACROS {
        store.save(&format!("macro{i}"), &sample_sequence()).unwrap();
    }
    let replacement = vec![Action::key("a", 0.0, 0.0)];
    store.save("macro0", &replacement).expect("overwrite at limit");
    assert_eq!(store.load("macro0").unwrap(), replacement);
    assert_eq!(store.names().unwrap().len(), MAX_MACROS);
}

#[test]
fn removing_frees_a_slot() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    for i in 0..MAX_MACROS {
        store.save(&format!("macro{i}"), &sample_sequence()).unwrap();
    }
    store.remove("macro2").expect("should remove");
    store
        .save("fresh", &sample_sequence())
        .expect("slot freed by remove");
}

#[test]
fn load_unknown_name_reports_not_found() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    assert!(matches!(
        store.load("ghost"),
        Err(StoreError::NotFound(name)) if name == "ghost"
    ));
}

#[test]
fn remove_unknown_name_reports_not_found() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    assert!(matches!(
        store.remove("ghost"),
        Err(StoreError::NotFound(name)) if name == "ghost"
    ));
}

#[test]
fn hostile_names_are_rejected() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    for name in ["", "../evil", "a/b", "a\\b", "dot.dot"] {
        assert!(
            matches!(
                store.save(name, &sample_sequence()),
                Err(StoreError::InvalidName(_))
            ),
            "'{name}' should be rejected"
        );
        assert!(matches!(store.load(name), Err(StoreError::InvalidName(_))));
    }
}

#[test]
fn files_use_the_documented_wire_format() {
    let dir = tempdir().unwrap();
    let store = MacroStore::new(dir.path().join("macros"));

    store.save("combo", &sample_sequence()).unwrap();
    let raw = std::fs::read_to_string(store.dir().join("combo.json")).unwrap();
    assert!(raw.contains("\"type\": \"key\""));
    assert!(raw.contains("\"value\": \"w\""));
    assert!(raw.contains("\"hold\": 0.1"));
    assert!(raw.contains("\"wait\": 1.5"));
}
