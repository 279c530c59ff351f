//! JSON-file user store: one array of account records.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;

use databox_catalog::AppConfig;

use crate::error::AuthError;
use crate::store::{UserStore, find_login, push_new, replace_config};
use crate::user::UserRecord;

#[derive(Debug)]
pub struct FileUserStore {
    path: PathBuf,
    users: RwLock<Vec<UserRecord>>,
}

impl FileUserStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let users = load(&path)?;
        tracing::info!(path = %path.display(), users = users.len(), "user store opened");
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, users: &[UserRecord]) -> Result<(), AuthError> {
        save(&self.path, users).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %format!("{e:#}"), "failed to persist users");
            AuthError::Storage(format!("{e:#}"))
        })
    }

    fn poisoned() -> AuthError {
        AuthError::Storage("user store lock poisoned".to_string())
    }
}

fn load(path: &Path) -> anyhow::Result<Vec<UserRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Write to a sibling temp file, then rename over the target.
fn save(path: &Path, users: &[UserRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(users).context("serializing users")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

impl UserStore for FileUserStore {
    fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        find_login(&users, email, password)
    }

    fn register(
        &self,
        email: &str,
        password: &str,
        default_config: AppConfig,
    ) -> Result<UserRecord, AuthError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        let mut next = users.clone();
        let record = push_new(&mut next, email, password, default_config)?;
        self.persist(&next)?;
        *users = next;
        Ok(record)
    }

    fn save_config(&self, email: &str, config: AppConfig) -> Result<(), AuthError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        let mut next = users.clone();
        replace_config(&mut next, email, config)?;
        self.persist(&next)?;
        *users = next;
        Ok(())
    }
}
