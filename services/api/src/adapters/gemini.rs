//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Gemini `generateContent` API.
//! It implements the `ContentGenerationService` port from the `core` crate.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use teaching_assistant_core::ports::{ContentGenerationService, GenerationError};
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerationService` against the Gemini API.
#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GeminiAdapter {
    /// Creates a new `GeminiAdapter` for `model`, served under `base_url`.
    pub fn new(client: Client, api_key: Option<String>, base_url: &str, model: &str) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        Self {
            client,
            api_key,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
///
/// A body with more than one candidate, or whose text is blank (as when the
/// content was safety-filtered), is rejected rather than guessed at.
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let envelope: GenerateContentResponse =
        serde_json::from_str(body).map_err(|_| GenerationError::UnexpectedResponseShape)?;

    let [candidate] = <[Candidate; 1]>::try_from(envelope.candidates)
        .map_err(|_| GenerationError::UnexpectedResponseShape)?;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::UnexpectedResponseShape)
}

fn error_for_status(status: StatusCode, body: String) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED => GenerationError::UpstreamAuth,
        StatusCode::BAD_REQUEST => GenerationError::MalformedPrompt,
        StatusCode::FORBIDDEN => GenerationError::PermissionDenied,
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        other => GenerationError::UpstreamStatus {
            status: other.as_u16(),
            body,
        },
    }
}

//=========================================================================================
// `ContentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGenerationService for GeminiAdapter {
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let request = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "Sending prompt upstream");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream rejected generation request");
            return Err(error_for_status(status, body));
        }

        extract_text(&body)
    }
}
