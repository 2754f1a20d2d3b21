//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the content generation endpoints and the
//! master definition for the OpenAPI specification.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use teaching_assistant_core::{generate_content, ContentKind, GenerationRequest};
use tracing::{error, info};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::error::{AppError, ErrorResponse};
use crate::web::auth::{self, AuthResponse, LoginRequest, SignupRequest, UserResponse};
use crate::web::middleware::AuthenticatedUser;
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::me_handler,
        lesson_plan_handler,
        quiz_handler,
        homework_handler,
        health_handler,
    ),
    components(
        schemas(
            GenerateContentRequest,
            GenerateContentResponse,
            HealthResponse,
            ErrorResponse,
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "content", description = "Lesson plan, quiz and homework generation."),
        (name = "auth", description = "Signup and login.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` security scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The form a teacher submits. Absent and null fields are treated as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
}

impl From<GenerateContentRequest> for GenerationRequest {
    fn from(body: GenerateContentRequest) -> Self {
        GenerationRequest {
            subject: body.subject.unwrap_or_default(),
            class_level: body.class_level.unwrap_or_default(),
            chapter: body.chapter.unwrap_or_default(),
        }
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            subject: Some(request.subject.clone()),
            class_level: Some(request.class_level.clone()),
            chapter: Some(request.chapter.clone()),
        }
    }
}

/// The generated text, returned verbatim from the upstream service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Shared body of the three generation endpoints.
async fn generate(
    state: &AppState,
    caller: AuthenticatedUser,
    kind: ContentKind,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    let Json(body) = payload?;

    info!(user_id = %caller.user_id, %kind, "Received content generation request");

    let request = GenerationRequest::from(body);
    let result = generate_content(state.generator.as_ref(), kind, &request)
        .await
        .map_err(|e| {
            error!(user_id = %caller.user_id, %kind, "Content generation failed: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(GenerateContentResponse {
        content: result.content,
    }))
}

/// Generate a lesson plan.
#[utoipa::path(
    post,
    path = "/api/ai/lesson-plan",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated lesson plan", body = GenerateContentResponse),
        (status = 400, description = "Missing subject, class level or chapter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Upstream generation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "content"
)]
pub async fn lesson_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    generate(&state, caller, ContentKind::LessonPlan, payload).await
}

/// Generate a quiz with multiple-choice, short- and long-answer questions.
#[utoipa::path(
    post,
    path = "/api/ai/quiz",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated quiz", body = GenerateContentResponse),
        (status = 400, description = "Missing subject, class level or chapter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Upstream generation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "content"
)]
pub async fn quiz_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    generate(&state, caller, ContentKind::Quiz, payload).await
}

/// Generate homework assignments.
#[utoipa::path(
    post,
    path = "/api/ai/homework",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated homework", body = GenerateContentResponse),
        (status = 400, description = "Missing subject, class level or chapter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Upstream generation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "content"
)]
pub async fn homework_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    generate(&state, caller, ContentKind::Homework, payload).await
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
