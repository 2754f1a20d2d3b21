//! crates/teaching_assistant_core/src/generation.rs
//!
//! The generation flow shared by every content endpoint: validate the request,
//! render the prompt for the requested kind, and make one upstream call.

use crate::domain::{ContentKind, GenerationRequest, GenerationResult};
use crate::ports::{ContentGenerationService, GenerationError};
use crate::prompts::build_prompt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Subject, class level or chapter was absent or blank.
    #[error("Missing required fields")]
    MissingFields,
    #[error(transparent)]
    Upstream(#[from] GenerationError),
}

/// Generates content of the given kind. The upstream service is not called
/// unless all three request fields are present.
pub async fn generate_content(
    upstream: &dyn ContentGenerationService,
    kind: ContentKind,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerateError> {
    if !request.is_complete() {
        return Err(GenerateError::MissingFields);
    }

    let prompt = build_prompt(kind, request);
    let content = upstream.generate_content(&prompt).await?;
    Ok(GenerationResult { content })
}
