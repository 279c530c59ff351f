use std::sync::RwLock;

use databox_catalog::AppConfig;

use crate::error::AuthError;
use crate::store::{UserStore, find_login, push_new, replace_config};
use crate::user::UserRecord;

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AuthError {
        AuthError::Storage("user store lock poisoned".to_string())
    }
}

impl UserStore for InMemoryUserStore {
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
        push_new(&mut users, email, password, default_config)
    }

    fn save_config(&self, email: &str, config: AppConfig) -> Result<(), AuthError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        replace_config(&mut users, email, config)
    }
}
