use std::sync::{Arc, Mutex};
use thiserror::Error;

#[cfg(target_os = "windows")]
pub mod win;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unknown mouse button '{0}'")]
    UnknownButton(String),
    #[error("input injection failed: {0}")]
    Injection(String),
}

/// Capability to press and release keys and mouse buttons.
///
/// The runner owns all timing: it calls a `*_down` method, sleeps for the
/// hold, then calls the matching `*_up`. Implementations only need to emit
/// the event.
pub trait InputDriver: Send {
    fn key_down(&mut self, key: &str) -> Result<(), InputError>;
    fn key_up(&mut self, key: &str) -> Result<(), InputError>;
    fn mouse_down(&mut self, button: &str) -> Result<(), InputError>;
    fn mouse_up(&mut self, button: &str) -> Result<(), InputError>;
}

/// One press or release as seen by the [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    MouseDown(String),
    MouseUp(String),
}

/// Driver that logs and records events instead of injecting them. Backs the
/// CLI dry-run mode and assertions about press/release pairing. Clones
/// share one event log, so a clone kept back stays readable after the
/// driver has moved into a controller.
#[derive(Clone, Default)]
pub struct RecordingDriver {
    events: Arc<Mutex<Vec<InputEvent>>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the recorded events; stays readable after the driver has
    /// moved into a controller.
    pub fn events(&self) -> Arc<Mutex<Vec<InputEvent>>> {
        self.events.clone()
    }

    /// Retrieve and clear the recorded events.
    pub fn take_events(&self) -> Vec<InputEvent> {
        let mut events = self.events.lock().unwrap();
        let out = events.clone();
        events.clear();
        out
    }
}

impl InputDriver for RecordingDriver {
    fn key_down(&mut self, key: &str) -> Result<(), InputError> {
        tracing::info!(key, "key down");
        self.events
            .lock()
            .unwrap()
            .push(InputEvent::KeyDown(key.to_string()));
        Ok(())
    }

    fn key_up(&mut self, key: &str) -> Result<(), InputError> {
        tracing::info!(key, "key up");
        self.events
            .lock()
            .unwrap()
            .push(InputEvent::KeyUp(key.to_string()));
        Ok(())
    }

    fn mouse_down(&mut self, button: &str) -> Result<(), InputError> {
        tracing::info!(button, "mouse down");
        self.events
            .lock()
            .unwrap()
            .push(InputEvent::MouseDown(button.to_string()));
        Ok(())
    }

    fn mouse_up(&mut self, button: &str) -> Result<(), InputError> {
        tracing::info!(button, "mouse up");
        self.events
            .lock()
            .unwrap()
            .push(InputEvent::MouseUp(button.to_string()));
        Ok(())
    }
}
