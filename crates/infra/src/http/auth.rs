use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{AdminAuth, AuthError};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AuthError::InvalidCredentials,
            ApiError::Rejected(msg) => AuthError::Rejected(msg),
            ApiError::NotFound => AuthError::Unavailable("login endpoint not found".to_string()),
            ApiError::Unavailable(msg) => AuthError::Unavailable(msg),
        }
    }
}

/// `POST /admin/login` against the REST backend.
#[derive(Debug, Clone)]
pub struct HttpAdminAuth {
    api: ApiClient,
}

impl HttpAdminAuth {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn request(&self, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.api
            .post("admin/login")
            .json(&LoginBody { email: email.trim(), password })
    }
}

#[async_trait]
impl AdminAuth for HttpAdminAuth {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let body: TokenBody = self.api.send_json(self.request(email, password)).await?;
        tracing::info!("admin token issued");
        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    use crate::http::classify;

    #[test]
    fn credentials_are_posted_as_json() {
        let api = ApiClient::with_client(reqwest::Client::new(), "http://shop.test");
        let request = HttpAdminAuth::new(api)
            .request(" admin@shop.test ", "hunter2")
            .build()
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://shop.test/api/admin/login");
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "admin@shop.test", "password": "hunter2"})
        );
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let err = AuthError::from(classify(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Invalid credentials"}"#,
        ));
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn token_body_shape() {
        let body: TokenBody =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();
        assert_eq!(body.access_token, "abc");
    }
}
