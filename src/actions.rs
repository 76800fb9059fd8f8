use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Named keys recognized in addition to the single characters `a`-`z` and
/// `0`-`9`.
pub const NAMED_KEYS: [&str; 14] = [
    "up", "down", "left", "right", "enter", "space", "esc", "tab", "backspace", "delete", "home",
    "end", "pageup", "pagedown",
];

/// Mouse buttons recognized by `mouse` actions.
pub const MOUSE_BUTTONS: [&str; 3] = ["left", "right", "middle"];

static NAMED_KEY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NAMED_KEYS.iter().copied().collect());

/// Check a key identifier against the recognized set.
pub fn is_known_key(name: &str) -> bool {
    if NAMED_KEY_SET.contains(name) {
        return true;
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_lowercase() || c.is_ascii_digit(),
        _ => false,
    }
}

/// Check a mouse button identifier against the recognized set.
pub fn is_known_button(name: &str) -> bool {
    MOUSE_BUTTONS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Key,
    Mouse,
    Wait,
}

/// One step of a macro.
///
/// Serialized with the wire field names `type`/`value`/`hold`/`wait`; `hold`
/// and `wait` are fractional seconds. Durations stay `f64` in the model so
/// validation can observe negative values coming from a file; they are turned
/// into [`Duration`]s only after [`validate`] has accepted the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Key or mouse button identifier; empty and ignored for `wait` actions.
    #[serde(default, rename = "value")]
    pub name: String,
    /// How long the key or button is held down, in seconds.
    #[serde(default)]
    pub hold: f64,
    /// Pause after this action completes, in seconds.
    #[serde(default)]
    pub wait: f64,
}

impl Action {
    pub fn key(name: &str, hold: f64, wait: f64) -> Self {
        Self {
            kind: ActionKind::Key,
            name: name.to_string(),
            hold,
            wait,
        }
    }

    pub fn mouse(button: &str, hold: f64, wait: f64) -> Self {
        Self {
            kind: ActionKind::Mouse,
            name: button.to_string(),
            hold,
            wait,
        }
    }

    pub fn wait(secs: f64) -> Self {
        Self {
            kind: ActionKind::Wait,
            name: String::new(),
            hold: 0.0,
            wait: secs,
        }
    }

    pub fn hold_duration(&self) -> Duration {
        duration_from_secs(self.hold)
    }

    pub fn wait_duration(&self) -> Duration {
        duration_from_secs(self.wait)
    }
}

fn duration_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// An ordered list of actions; insertion order is playback order.
pub type Sequence = Vec<Action>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("macro has no actions")]
    EmptySequence,
    #[error("action {index}: '{name}' is not a recognized key or button")]
    UnknownActionName { index: usize, name: String },
    #[error("action {index}: hold and wait must be non-negative")]
    NegativeDuration { index: usize },
}

/// Check a sequence before it is accepted for playback. Pure, no side effects.
///
/// Rejects empty sequences, `key`/`mouse` actions whose name is outside the
/// recognized set, and negative (or non-finite) `hold`/`wait` durations.
pub fn validate(sequence: &[Action]) -> Result<(), ValidationError> {
    if sequence.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    for (index, action) in sequence.iter().enumerate() {
        if !finite_non_negative(action.hold) || !finite_non_negative(action.wait) {
            return Err(ValidationError::NegativeDuration { index });
        }
        let known = match action.kind {
            ActionKind::Key => is_known_key(&action.name),
            ActionKind::Mouse => is_known_button(&action.name),
            ActionKind::Wait => true,
        };
        if !known {
            return Err(ValidationError::UnknownActionName {
                index,
                name: action.name.clone(),
            });
        }
    }
    Ok(())
}

fn finite_non_negative(secs: f64) -> bool {
    secs.is_finite() && secs >= 0.0
}

/// Load a sequence from a standalone JSON file (same record format the store
/// uses).
pub fn load_sequence(path: &str) -> anyhow::Result<Sequence> {
    let content = std::fs::read_to_string(path)?;
    let sequence: Sequence = serde_json::from_str(&content)?;
    Ok(sequence)
}
