use kbmacro::hotkey::{Hotkey, DEFAULT_COMBO};
use kbmacro::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::load(path.to_str().unwrap()).expect("should default");
    assert_eq!(settings.hotkey.as_deref(), Some(DEFAULT_COMBO));
    assert_eq!(settings.macros_dir(), "macros");
    assert!(!settings.hotkey_enabled);
    assert!(!settings.debug_logging);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();

    let settings = Settings {
        hotkey: Some("ctrl+shift+k".into()),
        macros_dir: Some("my-macros".into()),
        hotkey_enabled: true,
        debug_logging: true,
    };
    settings.save(path).expect("should save");

    let loaded = Settings::load(path).expect("should load");
    assert_eq!(loaded.hotkey.as_deref(), Some("ctrl+shift+k"));
    assert_eq!(loaded.macros_dir(), "my-macros");
    assert!(loaded.hotkey_enabled);
    assert!(loaded.debug_logging);
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"hotkey_enabled": true}"#).unwrap();

    let settings = Settings::load(path.to_str().unwrap()).expect("should load");
    assert!(settings.hotkey_enabled);
    assert!(!settings.debug_logging);
    assert_eq!(settings.macros_dir(), "macros");
    assert_eq!(settings.hotkey(), Hotkey::default());
}

#[test]
fn invalid_hotkey_string_falls_back_to_default() {
    let settings = Settings {
        hotkey: Some("ctrl+bogus".into()),
        ..Settings::default()
    };
    assert_eq!(settings.hotkey(), Hotkey::default());
}

#[test]
fn configured_hotkey_is_parsed() {
    let settings = Settings {
        hotkey: Some("shift+f".into()),
        ..Settings::default()
    };
    let hk = settings.hotkey();
    assert!(hk.shift && !hk.ctrl && !hk.alt);
    assert_eq!(hk.key, "f");
}
