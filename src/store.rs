use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::warn;

use crate::models::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists the whole user record as a single JSON document.
///
/// Both directions degrade silently: a missing or unreadable record loads
/// as the sample user, a failed save is logged and dropped. The in-memory
/// user stays the source of truth for the running session either way.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: PathBuf) -> Store {
        Store { path }
    }

    /// `<data_dir>/coindo/user.json`, falling back to the current directory
    /// when the platform data directory cannot be resolved.
    pub fn default_path(data_dir: Option<&Path>) -> PathBuf {
        let base = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")),
        };
        base.join("coindo").join("user.json")
    }

    pub fn load(&self, now: DateTime<Local>) -> User {
        match self.try_load() {
            Ok(user) => user,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "loading saved user failed, starting fresh");
                User::sample(now)
            }
        }
    }

    pub fn save(&self, user: &User) {
        if let Err(err) = self.try_save(user) {
            warn!(path = %self.path.display(), %err, "saving user failed");
        }
    }

    fn try_load(&self) -> Result<User, StoreError> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn try_save(&self, user: &User) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(user)?;
        // Write a sibling first so a crash mid-write cannot leave a
        // truncated record behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
