use async_trait::async_trait;

use crate::auth::{AdminAuth, AuthError};

/// A single admin account with a fixed token.
#[derive(Debug, Clone)]
pub struct InMemoryAdminAuth {
    email: String,
    password: String,
    token: String,
}

impl InMemoryAdminAuth {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl AdminAuth for InMemoryAdminAuth {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if email.trim().eq_ignore_ascii_case(&self.email) && password == self.password {
            Ok(self.token.clone())
        } else {
            tracing::warn!("admin login refused");
            Err(AuthError::InvalidCredentials)
        }
    }
}
