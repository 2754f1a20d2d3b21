//! End-to-end tests of the HTTP surface: the real router served on an
//! ephemeral port, with in-memory fakes behind the ports.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_lib::client::{ApiClient, ClientError};
use api_lib::config::Config;
use api_lib::web::{build_router, state::AppState, token::issue_token};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use teaching_assistant_core::{
    ContentGenerationService, ContentKind, DatabaseService, GenerationError, GenerationRequest,
    PortError, PortResult, User, UserCredentials,
};
use uuid::Uuid;

const JWT_SECRET: &str = "integration-secret";

#[derive(Default)]
struct InMemoryUsers {
    by_email: Mutex<HashMap<String, UserCredentials>>,
}

#[async_trait]
impl DatabaseService for InMemoryUsers {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut users = self.by_email.lock().unwrap();
        if users.contains_key(email) {
            return Err(PortError::Conflict(email.to_string()));
        }
        let credentials = UserCredentials {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        users.insert(email.to_string(), credentials.clone());
        Ok(User {
            user_id: credentials.user_id,
            email: credentials.email,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.by_email
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(email.to_string()))
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.by_email
            .lock()
            .unwrap()
            .values()
            .find(|c| c.user_id == user_id)
            .map(|c| User {
                user_id: c.user_id,
                email: c.email.clone(),
            })
            .ok_or_else(|| PortError::NotFound(user_id.to_string()))
    }
}

/// Answers every prompt with a fixed reply and remembers what it was asked.
struct ScriptedGenerator {
    reply: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerationService for ScriptedGenerator {
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

struct TestServer {
    addr: SocketAddr,
    generator: Arc<ScriptedGenerator>,
}

impl TestServer {
    async fn start(reply: Result<String, GenerationError>) -> Self {
        let config = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://unused".to_string()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        let generator = Arc::new(ScriptedGenerator::new(reply));
        let state = Arc::new(AppState {
            db: Arc::new(InMemoryUsers::default()),
            config: Arc::new(config),
            generator: generator.clone(),
        });
        let app = build_router(state).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, generator }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(self.url(""))
    }
}

fn algebra() -> GenerationRequest {
    GenerationRequest::new("Algebra", "8", "Linear Equations")
}

#[tokio::test]
async fn signup_login_and_generate_quiz() {
    let server = TestServer::start(Ok("1. What is 2x = 4?".to_string())).await;
    let client = server.client();

    let signed_up = client.signup("Teacher@School.org", "chalkboard").await.unwrap();
    assert_eq!(signed_up.user.email, "teacher@school.org");

    let logged_in = client.login("teacher@school.org", "chalkboard").await.unwrap();
    assert_eq!(logged_in.user.id, signed_up.user.id);

    let result = client
        .generate(&logged_in.token, ContentKind::Quiz, &algebra())
        .await
        .unwrap();
    assert_eq!(result.content, "1. What is 2x = 4?");

    let prompts = server.generator.prompts();
    assert_eq!(prompts.len(), 1);
    for section in [
        "5 Multiple Choice Questions",
        "3 Short Answer Questions",
        "2 Long Answer Questions",
    ] {
        assert!(prompts[0].contains(section));
    }
}

#[tokio::test]
async fn each_kind_uses_its_own_template() {
    let server = TestServer::start(Ok("generated".to_string())).await;
    let token = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();
    let client = server.client();

    for kind in ContentKind::ALL {
        client.generate(&token, kind, &algebra()).await.unwrap();
    }

    let prompts = server.generator.prompts();
    assert!(prompts[0].contains("Homework Ideas"));
    assert!(prompts[1].contains("Include answers for all questions."));
    assert!(prompts[2].contains("Grading Criteria"));
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected_before_validation() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let http = reqwest::Client::new();

    for kind in ContentKind::ALL {
        // An empty body would be a validation failure if auth ran second.
        let response = http
            .post(server.url(&format!("/api/ai/{}", kind)))
            .json(&json!({}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "No token, authorization denied");
    }
    assert!(server.generator.prompts().is_empty());
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let forged = issue_token(Uuid::new_v4(), "someone-elses-secret", 1).unwrap();

    let err = server
        .client()
        .generate(&forged, ContentKind::LessonPlan, &algebra())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Token is not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(server.generator.prompts().is_empty());
}

#[tokio::test]
async fn missing_fields_never_reach_upstream() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let token = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();
    let http = reqwest::Client::new();

    for body in [
        json!({ "classLevel": "8", "chapter": "Linear Equations" }),
        json!({ "subject": "Algebra", "chapter": "Linear Equations" }),
        json!({ "subject": "Algebra", "classLevel": "8", "chapter": "" }),
    ] {
        let response = http
            .post(server.url("/api/ai/homework"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Missing required fields");
    }
    assert!(server.generator.prompts().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let token = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();

    let response = reqwest::Client::new()
        .post(server.url("/api/ai/quiz"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn auth_routes_reject_unreadable_bodies_with_a_message() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let http = reqwest::Client::new();

    for path in ["/api/auth/signup", "/api/auth/login"] {
        for (content_type, payload) in [
            ("application/json", "{not json"),
            ("application/json", r#"{"email":"a@b.c"}"#),
            ("text/plain", r#"{"email":"a@b.c","password":"secret1"}"#),
        ] {
            let response = http
                .post(server.url(path))
                .header("content-type", content_type)
                .body(payload)
                .send()
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path} {payload}");
            let body: Value = response.json().await.unwrap();
            assert!(body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body"));
        }
    }
}

#[tokio::test]
async fn upstream_rate_limit_surfaces_as_server_error_with_message() {
    let server = TestServer::start(Err(GenerationError::RateLimited)).await;
    let token = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();

    let err = server
        .client()
        .generate(&token, ContentKind::Quiz, &algebra())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Too many requests. Please try again later");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_upstream_key_is_reported_to_the_caller() {
    let server = TestServer::start(Err(GenerationError::MissingCredential)).await;
    let token = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();

    let err = server
        .client()
        .generate(&token, ContentKind::LessonPlan, &algebra())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn signup_rules_and_bad_credentials() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let client = server.client();

    client.signup("a@school.org", "secret1").await.unwrap();

    let duplicate = client.signup("A@school.org", "secret2").await.unwrap_err();
    assert!(matches!(
        duplicate,
        ClientError::Api { status: StatusCode::CONFLICT, .. }
    ));

    for (email, password) in [("b@school.org", "123"), ("   ", "secret1")] {
        let rejected = client.signup(email, password).await.unwrap_err();
        assert!(matches!(
            rejected,
            ClientError::Api { status: StatusCode::BAD_REQUEST, .. }
        ));
    }

    for (email, password) in [("a@school.org", "wrong-pw"), ("nobody@school.org", "secret1")] {
        let err = client.login(email, password).await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let server = TestServer::start(Ok("unused".to_string())).await;
    let auth = server.client().signup("me@school.org", "secret1").await.unwrap();
    let http = reqwest::Client::new();

    let response = http
        .get(server.url("/api/auth/me"))
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "me@school.org");
    assert_eq!(body["id"], auth.user.id.to_string());

    // A valid signature for an account that does not exist.
    let orphan = issue_token(Uuid::new_v4(), JWT_SECRET, 1).unwrap();
    let response = http
        .get(server.url("/api/auth/me"))
        .bearer_auth(&orphan)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::start(Ok("unused".to_string())).await;

    let response = reqwest::get(server.url("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}
