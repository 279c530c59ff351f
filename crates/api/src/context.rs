use databox_auth::SessionToken;

/// Authenticated operator for a request.
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorContext {
    email: String,
    token: SessionToken,
}

impl OperatorContext {
    pub fn new(email: String, token: SessionToken) -> Self {
        Self { email, token }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }
}
