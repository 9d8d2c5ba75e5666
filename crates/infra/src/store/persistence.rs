//! Where a datastore document lives between writes.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use mockrest_core::Database;
use serde_json::Value;

use crate::store::{StoreError, StoreResult};

/// Loads and saves a whole datastore document.
pub trait Persistence: Send + Sync {
    /// Load the document; `None` when nothing has been saved yet.
    fn load(&self) -> StoreResult<Option<Database>>;

    /// Replace the saved document.
    fn save(&self, db: &Database) -> StoreResult<()>;
}

/// A pretty-printed JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> StoreResult<Option<Database>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(db) => Ok(Some(db)),
            _ => Err(StoreError::Corrupt(format!(
                "{} must contain a JSON object at the top level",
                self.path.display()
            ))),
        }
    }

    fn save(&self, db: &Database) -> StoreResult<()> {
        let staging = self.staging_path();
        let text = serde_json::to_string_pretty(db)?;
        fs::write(&staging, text).map_err(|e| self.io_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))
    }
}

/// Keeps nothing; the store's in-memory copy is all there is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Volatile;

impl Persistence for Volatile {
    fn load(&self) -> StoreResult<Option<Database>> {
        Ok(None)
    }

    fn save(&self, _db: &Database) -> StoreResult<()> {
        Ok(())
    }
}
