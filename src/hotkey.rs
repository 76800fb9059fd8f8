//! Global toggle hotkey: combo parsing and the background listener.

use crate::actions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[cfg(target_os = "windows")]
use rdev::{listen, EventType, Key};
#[cfg(target_os = "windows")]
use std::thread;
#[cfg(target_os = "windows")]
use std::time::Duration;

/// Combo watched when the settings file does not name one.
pub const DEFAULT_COMBO: &str = "ctrl+alt+m";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("invalid hotkey combo '{0}'")]
    InvalidCombo(String),
    #[error("hotkey registration failed: {0}")]
    RegistrationFailed(String),
}

/// A modifier set plus one watched key, e.g. `ctrl+alt+m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Key name from the action vocabulary (`m`, `space`, `f` ...).
    pub key: String,
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            ctrl: true,
            shift: false,
            alt: true,
            key: "m".to_string(),
        }
    }
}

/// Parse a combo string like `ctrl+alt+m` into a [`Hotkey`].
///
/// Modifiers are `ctrl` (or `control`), `shift` and `alt` in any order; the
/// remaining part must be exactly one recognized key name.
pub fn parse_hotkey(s: &str) -> Result<Hotkey, HotkeyError> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<String> = None;

    for part in s.split('+') {
        let lower = part.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ctrl" | "control" => ctrl = true,
            "shift" => shift = true,
            "alt" => alt = true,
            "" => {}
            _ => {
                if actions::is_known_key(&lower) && key.is_none() {
                    key = Some(lower);
                } else {
                    return Err(HotkeyError::InvalidCombo(s.to_string()));
                }
            }
        }
    }

    match key {
        Some(key) => Ok(Hotkey {
            ctrl,
            shift,
            alt,
            key,
        }),
        None => Err(HotkeyError::InvalidCombo(s.to_string())),
    }
}

/// Latched signal raised by the global listener when the combo fires.
///
/// The owner polls [`HotkeyTrigger::take`] from its main loop; each matched
/// combo press produces exactly one `true` (edge-triggered, so holding the
/// combo down does not repeat).
pub struct HotkeyTrigger {
    fired: Arc<Mutex<bool>>,
    enabled: Arc<AtomicBool>,
    hotkey: Hotkey,
}

impl HotkeyTrigger {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            fired: Arc::new(Mutex::new(false)),
            enabled: Arc::new(AtomicBool::new(true)),
            hotkey,
        }
    }

    /// Enable or disable combo matching without tearing the listener down.
    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Consume a pending firing, if any.
    pub fn take(&self) -> bool {
        let mut fired = self.fired.lock().unwrap();
        if *fired {
            *fired = false;
            true
        } else {
            false
        }
    }

    /// Spawn the background keyboard listener for this trigger's combo.
    ///
    /// Global key capture is only available on Windows; elsewhere this
    /// returns [`HotkeyError::RegistrationFailed`] and the trigger never
    /// fires.
    #[cfg(target_os = "windows")]
    pub fn start_listener(&self) -> Result<(), HotkeyError> {
        let watch = rdev_key(&self.hotkey.key).ok_or_else(|| {
            HotkeyError::RegistrationFailed(format!("unsupported key '{}'", self.hotkey.key))
        })?;
        let need_ctrl = self.hotkey.ctrl;
        let need_shift = self.hotkey.shift;
        let need_alt = self.hotkey.alt;
        let fired = self.fired.clone();
        let enabled = self.enabled.clone();
        tracing::debug!(?watch, "starting hotkey listener");

        thread::spawn(move || loop {
            let fired = fired.clone();
            let enabled = enabled.clone();
            let mut ctrl_pressed = false;
            let mut shift_pressed = false;
            let mut alt_pressed = false;
            let mut watch_pressed = false;
            let mut triggered = false;

            let result = listen(move |event| {
                match event.event_type {
                    EventType::KeyPress(k) => {
                        match k {
                            Key::ControlLeft | Key::ControlRight => ctrl_pressed = true,
                            Key::ShiftLeft | Key::ShiftRight => shift_pressed = true,
                            Key::Alt | Key::AltGr => alt_pressed = true,
                            _ => {}
                        }
                        if k == watch {
                            watch_pressed = true;
                        }
                    }
                    EventType::KeyRelease(k) => {
                        match k {
                            Key::ControlLeft | Key::ControlRight => ctrl_pressed = false,
                            Key::ShiftLeft | Key::ShiftRight => shift_pressed = false,
                            Key::Alt | Key::AltGr => alt_pressed = false,
                            _ => {}
                        }
                        if k == watch {
                            watch_pressed = false;
                        }
                    }
                    _ => {}
                }

                let combo = watch_pressed
                    && (!need_ctrl || ctrl_pressed)
                    && (!need_shift || shift_pressed)
                    && (!need_alt || alt_pressed);
                if combo {
                    if !triggered {
                        triggered = true;
                        if enabled.load(Ordering::SeqCst) {
                            tracing::debug!("hotkey combo matched");
                            if let Ok(mut flag) = fired.lock() {
                                *flag = true;
                            }
                        }
                    }
                } else {
                    triggered = false;
                }
            });

            match result {
                Ok(()) => tracing::warn!("hotkey listener exited unexpectedly, restarting shortly"),
                Err(e) => tracing::warn!("hotkey listener failed: {:?}, retrying shortly", e),
            }
            thread::sleep(Duration::from_millis(500));
        });
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    pub fn start_listener(&self) -> Result<(), HotkeyError> {
        Err(HotkeyError::RegistrationFailed(
            "global hotkey capture is only supported on Windows".to_string(),
        ))
    }
}

#[cfg(target_os = "windows")]
fn rdev_key(name: &str) -> Option<Key> {
    match name {
        "space" => Some(Key::Space),
        "tab" => Some(Key::Tab),
        "enter" => Some(Key::Return),
        "esc" => Some(Key::Escape),
        "delete" => Some(Key::Delete),
        "backspace" => Some(Key::Backspace),
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        "pageup" => Some(Key::PageUp),
        "pagedown" => Some(Key::PageDown),
        "left" => Some(Key::LeftArrow),
        "right" => Some(Key::RightArrow),
        "up" => Some(Key::UpArrow),
        "down" => Some(Key::DownArrow),
        _ if name.len() == 1 => {
            let c = name.chars().next()?;
            if c.is_ascii_digit() {
                Some(match c {
                    '0' => Key::Num0,
                    '1' => Key::Num1,
                    '2' => Key::Num2,
                    '3' => Key::Num3,
                    '4' => Key::Num4,
                    '5' => Key::Num5,
                    '6' => Key::Num6,
                    '7' => Key::Num7,
                    '8' => Key::Num8,
                    '9' => Key::Num9,
                    _ => return None,
                })
            } else if c.is_ascii_lowercase() {
                Some(match c {
                    'a' => Key::KeyA,
                    'b' => Key::KeyB,
                    'c' => Key::KeyC,
                    'd' => Key::KeyD,
                    'e' => Key::KeyE,
                    'f' => Key::KeyF,
                    'g' => Key::KeyG,
                    'h' => Key::KeyH,
                    'i' => Key::KeyI,
                    'j' => Key::KeyJ,
                    'k' => Key::KeyK,
                    'l' => Key::KeyL,
                    'm' => Key::KeyM,
                    'n' => Key::KeyN,
                    'o' => Key::KeyO,
                    'p' => Key::KeyP,
                    'q' => Key::KeyQ,
                    'r' => Key::KeyR,
                    's' => Key::KeyS,
                    't' => Key::KeyT,
                    'u' => Key::KeyU,
                    'v' => Key::KeyV,
                    'w' => Key::KeyW,
                    'x' => Key::KeyX,
                    'y' => Key::KeyY,
                    'z' => Key::KeyZ,
                    _ => return None,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}
