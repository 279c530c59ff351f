//! Opaque bearer sessions.

use core::str::FromStr;
use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

/// Active sessions: token -> operator email.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionToken, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, email: &str) -> SessionToken {
        let token = SessionToken::new();
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token, email.to_string());
        token
    }

    /// Email of the operator owning `token`.
    pub fn resolve(&self, token: &SessionToken) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
    }

    /// Returns whether the token was active.
    pub fn revoke(&self, token: &SessionToken) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_resolve_revoke() {
        let registry = SessionRegistry::new();
        let token = registry.issue("a@b.c");

        assert_eq!(registry.resolve(&token).as_deref(), Some("a@b.c"));
        assert!(registry.revoke(&token));
        assert_eq!(registry.resolve(&token), None);
        assert!(!registry.revoke(&token));
    }

    #[test]
    fn token_parses_from_display() {
        let token = SessionToken::new();
        let parsed: SessionToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
        assert_eq!("garbage".parse::<SessionToken>(), Err(AuthError::InvalidCredentials));
    }
}
