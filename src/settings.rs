use crate::hotkey::{parse_hotkey, Hotkey, DEFAULT_COMBO};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Toggle combo watched by the global hotkey listener.
    pub hotkey: Option<String>,
    /// Directory holding the saved macro files. Defaults to `macros`.
    pub macros_dir: Option<String>,
    /// Start the global hotkey listener when a run begins.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub hotkey_enabled: bool,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_toggle_hotkey() -> Option<String> {
    Some(DEFAULT_COMBO.into())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: default_toggle_hotkey(),
            macros_dir: Some("macros".into()),
            hotkey_enabled: false,
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Parse the configured toggle combo, falling back to
    /// [`DEFAULT_COMBO`] when the string is missing or invalid.
    pub fn hotkey(&self) -> Hotkey {
        if let Some(hotkey) = &self.hotkey {
            match parse_hotkey(hotkey) {
                Ok(k) => return k,
                Err(err) => {
                    tracing::warn!(
                        "{err}; using default {DEFAULT_COMBO}"
                    );
                }
            }
        }
        Hotkey::default()
    }

    pub fn macros_dir(&self) -> &str {
        self.macros_dir.as_deref().unwrap_or("macros")
    }
}
