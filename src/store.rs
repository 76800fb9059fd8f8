use crate::actions::{Action, Sequence};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of named macros the store will hold.
pub const MAX_MACROS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("macro limit reached ({MAX_MACROS}); remove one before saving a new name")]
    LimitReached,
    #[error("macro '{0}' not found")]
    NotFound(String),
    #[error("invalid macro name '{0}': use letters, digits, space, '-' or '_'")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Named macro persistence: one pretty-printed JSON file per macro under a
/// directory. Saving an existing name overwrites it; saving a new name while
/// [`MAX_MACROS`] macros exist is rejected.
pub struct MacroStore {
    dir: PathBuf,
}

impl MacroStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Stored macro names, sorted. A missing store directory reads as empty.
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn save(&self, name: &str, sequence: &[Action]) -> Result<(), StoreError> {
        check_name(name)?;
        let names = self.names()?;
        if names.len() >= MAX_MACROS && !names.iter().any(|n| n == name) {
            return Err(StoreError::LimitReached);
        }
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(sequence)?;
        fs::write(self.path_for(name), json)?;
        tracing::debug!(name, dir = %self.dir.display(), "macro saved");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Sequence, StoreError> {
        check_name(name)?;
        let content = match fs::read_to_string(self.path_for(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        check_name(name)?;
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// Names map straight to file names, so keep them to a set that cannot
// traverse out of the store directory.
fn check_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
