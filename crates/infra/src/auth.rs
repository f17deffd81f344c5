//! Admin sign-in port.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("login unavailable: {0}")]
    Unavailable(String),
}

/// Exchanges admin credentials for a bearer token.
#[async_trait]
pub trait AdminAuth: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

#[async_trait]
impl<T> AdminAuth for std::sync::Arc<T>
where
    T: AdminAuth + ?Sized,
{
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        (**self).login(email, password).await
    }
}
