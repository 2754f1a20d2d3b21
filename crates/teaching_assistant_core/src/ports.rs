//! crates/teaching_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for persistence port operations.
/// This abstracts away the specific errors from the underlying database driver.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Failures of the upstream content generation service.
///
/// The `Display` text of each variant is what the caller ultimately sees in the
/// `message` field of an error response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Gemini API key not found. Please add GEMINI_API_KEY to your environment")]
    MissingCredential,
    #[error("Invalid API key. Please check your GEMINI_API_KEY")]
    UpstreamAuth,
    #[error("Bad request. Please check the prompt format")]
    MalformedPrompt,
    #[error("API key does not have permission to access Gemini API")]
    PermissionDenied,
    #[error("Too many requests. Please try again later")]
    RateLimited,
    #[error("Invalid response format from Gemini API")]
    UnexpectedResponseShape,
    #[error("Upstream request failed with status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("Upstream request failed: {0}")]
    Transport(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// Stores a new user. Fails with `PortError::Conflict` if the email is taken.
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;
}

#[async_trait]
pub trait ContentGenerationService: Send + Sync {
    /// Sends a single prompt upstream and returns the generated text.
    /// Exactly one attempt is made.
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError>;
}
