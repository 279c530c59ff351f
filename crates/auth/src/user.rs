use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use databox_catalog::AppConfig;

use crate::error::AuthError;

/// Stored operator account.
///
/// Passwords are compared verbatim; this is a single-operator, local-device
/// store, not an identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password: String,
    pub config: AppConfig,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(email: &str, password: &str, config: AppConfig) -> Result<Self, AuthError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("email must be an address".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".to_string()));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            config,
            created_at: Utc::now(),
        })
    }

    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            config: self.config.clone(),
        }
    }
}

/// Account view handed out after login; never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub config: AppConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_email_and_password() {
        assert!(UserRecord::new("admin@tradeum.com", "admin123", AppConfig::default()).is_ok());
        assert!(matches!(
            UserRecord::new("  ", "x", AppConfig::default()),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            UserRecord::new("a@b.c", "", AppConfig::default()),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn profile_hides_password() {
        let user = UserRecord::new("a@b.c", "pw", AppConfig::default()).unwrap();
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.c");
    }
}
