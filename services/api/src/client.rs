//! services/api/src/client.rs
//!
//! A typed HTTP client for the API, used in place of the browser form.
//!
//! The bearer token is an explicit argument of every authenticated call; the
//! client never stores it.

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use teaching_assistant_core::{ContentKind, GenerationRequest, GenerationResult};

use crate::error::ErrorResponse;
use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::rest::{GenerateContentRequest, GenerateContentResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// A non-success response. `message` is the server's `message` field verbatim.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/auth/signup", &body, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/auth/login", &body, None).await
    }

    /// Requests generated content of `kind`, authenticated with `token`.
    pub async fn generate(
        &self,
        token: &str,
        kind: ContentKind,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ClientError> {
        let path = format!("/api/ai/{}", kind.as_str());
        let response: GenerateContentResponse = self
            .post_json(&path, &GenerateContentRequest::from(request), Some(token))
            .await?;
        Ok(GenerationResult {
            content: response.content,
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(ClientError::Api { status, message })
    }
}
