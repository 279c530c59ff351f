use std::sync::Arc;

use databox_catalog::AppConfig;

use crate::error::AuthError;
use crate::user::UserRecord;

/// Operator account persistence.
pub trait UserStore: Send + Sync {
    /// Exact email + password match.
    fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError>;

    /// Create an account seeded with `default_config`. Emails are unique.
    fn register(
        &self,
        email: &str,
        password: &str,
        default_config: AppConfig,
    ) -> Result<UserRecord, AuthError>;

    /// Replace the stored configuration of `email`.
    fn save_config(&self, email: &str, config: AppConfig) -> Result<(), AuthError>;

    fn logout(&self, email: &str) -> Result<(), AuthError> {
        tracing::debug!(email, "logout");
        Ok(())
    }
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        (**self).login(email, password)
    }

    fn register(
        &self,
        email: &str,
        password: &str,
        default_config: AppConfig,
    ) -> Result<UserRecord, AuthError> {
        (**self).register(email, password, default_config)
    }

    fn save_config(&self, email: &str, config: AppConfig) -> Result<(), AuthError> {
        (**self).save_config(email, config)
    }

    fn logout(&self, email: &str) -> Result<(), AuthError> {
        (**self).logout(email)
    }
}

/// Shared lookup/mutation rules over a plain list of records.
pub(crate) fn find_login(users: &[UserRecord], email: &str, password: &str) -> Result<UserRecord, AuthError> {
    users
        .iter()
        .find(|u| u.email == email.trim() && u.password_matches(password))
        .cloned()
        .ok_or(AuthError::InvalidCredentials)
}

pub(crate) fn push_new(
    users: &mut Vec<UserRecord>,
    email: &str,
    password: &str,
    default_config: AppConfig,
) -> Result<UserRecord, AuthError> {
    let record = UserRecord::new(email, password, default_config)?;
    if users.iter().any(|u| u.email == record.email) {
        return Err(AuthError::DuplicateUser(record.email));
    }
    users.push(record.clone());
    Ok(record)
}

pub(crate) fn replace_config(
    users: &mut [UserRecord],
    email: &str,
    config: AppConfig,
) -> Result<(), AuthError> {
    let user = users
        .iter_mut()
        .find(|u| u.email == email)
        .ok_or_else(|| AuthError::UnknownUser(email.to_string()))?;
    user.config = config;
    Ok(())
}
