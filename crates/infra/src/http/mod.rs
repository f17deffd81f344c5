//! REST adapters for the catalog and inquiry stores.
//!
//! Paths are relative to `{api_url}/api`. Admin calls carry the bearer token
//! found in session storage under [`ADMIN_TOKEN_KEY`](crate::session::ADMIN_TOKEN_KEY).

pub mod auth;
pub mod catalog;
pub mod inquiries;

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use budbar_catalog::CatalogStoreError;
use budbar_core::DomainError;
use budbar_inquiries::InquiryStoreError;

use crate::config::AppConfig;
use crate::session::{ADMIN_TOKEN_KEY, SessionStorage};

pub use auth::HttpAdminAuth;
pub use catalog::HttpCatalogStore;
pub use inquiries::HttpInquiryStore;

/// Failure of one REST call, before it is mapped onto a store error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Unavailable(err.to_string())
    }
}

impl From<ApiError> for CatalogStoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => CatalogStoreError::Unauthorized,
            ApiError::NotFound => CatalogStoreError::NotFound,
            ApiError::Rejected(msg) => CatalogStoreError::Invalid(DomainError::validation(msg)),
            ApiError::Unavailable(msg) => CatalogStoreError::Unavailable(msg),
        }
    }
}

impl From<ApiError> for InquiryStoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => InquiryStoreError::Unauthorized,
            ApiError::NotFound => InquiryStoreError::NotFound,
            ApiError::Rejected(msg) => InquiryStoreError::Rejected(msg),
            ApiError::Unavailable(msg) => InquiryStoreError::Unavailable(msg),
        }
    }
}

/// Map a non-success response onto an [`ApiError`].
///
/// FastAPI-style `{"detail": "..."}` bodies are unwrapped to their message.
pub fn classify(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Rejected(detail),
        other => ApiError::Unavailable(format!("HTTP {}: {detail}", other.as_u16())),
    }
}

/// Shared HTTP client for the REST backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Arc<dyn SessionStorage>>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(http, &config.api_url))
    }

    pub fn with_client(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/api", api_url.trim_end_matches('/')),
            session: None,
        }
    }

    /// Read the admin bearer token from `storage` on every admin call.
    pub fn with_session(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.session = Some(storage);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Attach the stored admin token. Without one the backend answers 401.
    pub(crate) fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .as_ref()
            .and_then(|storage| match storage.get(ADMIN_TOKEN_KEY) {
                Ok(token) => token,
                Err(err) => {
                    tracing::warn!(error = %err, "could not read admin token");
                    None
                }
            });

        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify(status, &body);
        tracing::warn!(status = status.as_u16(), error = %err, "api call failed");
        Err(err)
    }

    pub(crate) async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unavailable(format!("malformed response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStorage;

    fn client() -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), "http://localhost:8000/")
    }

    #[test]
    fn urls_live_under_api() {
        let api = client();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(api.url("/menu/items"), "http://localhost:8000/api/menu/items");
        assert_eq!(api.url("inquiries"), "http://localhost:8000/api/inquiries");
    }

    #[test]
    fn status_codes_map_to_store_errors() {
        assert_eq!(classify(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized);
        assert_eq!(classify(StatusCode::NOT_FOUND, "{}"), ApiError::NotFound);
        assert_eq!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"bad phone"}"#),
            ApiError::Rejected("bad phone".to_string())
        );
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::Unavailable("HTTP 502: upstream down".to_string())
        );

        assert_eq!(
            CatalogStoreError::from(ApiError::Unauthorized),
            CatalogStoreError::Unauthorized
        );
        assert!(InquiryStoreError::from(ApiError::Unavailable("x".into())).is_retryable());
    }

    #[test]
    fn admin_requests_carry_the_stored_token() {
        let storage = Arc::new(InMemorySessionStorage::new());
        let api = client().with_session(storage.clone());

        let anonymous = api.authorized(api.get("admin/inquiries")).build().unwrap();
        assert!(anonymous.headers().get(reqwest::header::AUTHORIZATION).is_none());

        storage.set(ADMIN_TOKEN_KEY, "t0ken".to_string()).unwrap();
        let request = api.authorized(api.get("admin/inquiries")).build().unwrap();
        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(header, Some("Bearer t0ken"));
    }
}
