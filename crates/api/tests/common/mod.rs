//! Shared helpers for the API integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use lingo_api::config::{PracticeConfig, ServerConfig};
use lingo_api::routes;
use lingo_api::state::AppState;
use lingo_core::levels::CefrLevel;
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_core::types::DbId;
use lingo_db::models::question::{NewQuestion, Question};
use lingo_db::repositories::{QuestionRepo, UserRepo};
use lingo_genai::generator::{GenaiError, GeneratedQuestion, GenerationSpec, QuestionGenerator};

/// Identity most tests act as.
pub const TEST_USER: &str = "learner-1";

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

enum StubMode {
    Succeed,
    Fail,
    /// Fail every nth call (1-based), succeed otherwise.
    FailEveryNth(usize),
}

/// In-process [`QuestionGenerator`] with scripted behaviour, so inventory
/// flows are exercised without a generation service.
pub struct StubGenerator {
    mode: StubMode,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            mode: StubMode::Succeed,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            mode: StubMode::Fail,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn fail_every_nth(n: usize) -> Arc<Self> {
        Arc::new(Self {
            mode: StubMode::FailEveryNth(n),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionGenerator for StubGenerator {
    async fn generate(&self, spec: &GenerationSpec) -> Result<GeneratedQuestion, GenaiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = match self.mode {
            StubMode::Succeed => false,
            StubMode::Fail => true,
            StubMode::FailEveryNth(n) => call % n == 0,
        };
        if fail {
            return Err(GenaiError::InvalidResponse(format!(
                "scripted failure on call {call}"
            )));
        }
        Ok(GeneratedQuestion {
            prompt: format!("{} drill {call} at {}", spec.question_type, spec.cefr_level),
            preparation_secs: 20,
            min_response_secs: 30,
            max_response_secs: 90,
            media_url: None,
            metadata: serde_json::json!({}),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        genai_base_url: "http://localhost:8089".to_string(),
        genai_timeout_secs: 30,
    }
}

/// Build the full application router with default practice tunables and a
/// generator that always fails, so inventory stays exactly what the test
/// seeded.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, PracticeConfig::default(), StubGenerator::failing())
}

/// Build the full application router with all middleware layers, using the
/// given database pool, practice tunables and generator.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with(
    pool: PgPool,
    practice: PracticeConfig,
    generator: Arc<dyn QuestionGenerator>,
) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        practice: Arc::new(practice),
        generator,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(lingo_api::identity::USER_ID_HEADER),
            HeaderName::from_static(lingo_api::identity::USER_NAME_HEADER),
            HeaderName::from_static(lingo_api::identity::USER_ROLE_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    role: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(lingo_api::identity::USER_ID_HEADER, user);
    }
    if let Some(role) = role {
        builder = builder.header(lingo_api::identity::USER_ROLE_HEADER, role);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without identity headers.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None, None).await
}

/// POST without identity headers.
pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None, None, None).await
}

/// GET as the given user.
pub async fn get_as(app: Router, user: &str, uri: &str) -> Response {
    send(app, Method::GET, uri, Some(user), None, None).await
}

/// POST as the given user, without a body.
pub async fn post_as(app: Router, user: &str, uri: &str) -> Response {
    send(app, Method::POST, uri, Some(user), None, None).await
}

/// POST a JSON body as the given user.
pub async fn post_json_as(app: Router, user: &str, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(user), None, Some(body)).await
}

/// GET as the given user with the admin role.
pub async fn get_as_admin(app: Router, user: &str, uri: &str) -> Response {
    send(app, Method::GET, uri, Some(user), Some("admin"), None).await
}

/// POST a JSON body as the given user with the admin role.
pub async fn post_json_as_admin(app: Router, user: &str, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(user), Some("admin"), Some(body)).await
}

/// PUT a JSON body as the given user with the admin role.
pub async fn put_json_as_admin(app: Router, user: &str, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(user), Some("admin"), Some(body)).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("response body was not JSON: {e}"))
}

// ---------------------------------------------------------------------------
// Store seeding
// ---------------------------------------------------------------------------

/// Resolve an external identity to its profile id, creating the row when
/// missing (the same path the handlers take).
pub async fn user_id_of(pool: &PgPool, external_ref: &str) -> DbId {
    UserRepo::get_or_create(pool, external_ref, None)
        .await
        .unwrap()
        .id
}

/// Insert one published question for a key.
pub async fn seed_question(
    pool: &PgPool,
    question_type: QuestionType,
    level: CefrLevel,
    tag: &str,
) -> Question {
    QuestionRepo::insert_generated(
        pool,
        &NewQuestion {
            skill_area: question_type.skill_area().as_str().to_string(),
            question_type: question_type.as_str().to_string(),
            cefr_level: level.ordinal(),
            prompt: format!("{question_type} prompt {tag}"),
            preparation_secs: 20,
            min_response_secs: 30,
            max_response_secs: 90,
            media_url: None,
            metadata: serde_json::json!({}),
        },
    )
    .await
    .unwrap()
}

/// Insert `per_key` published questions for every question type at one
/// level, so a composed session can fill every skill area.
pub async fn seed_all_keys(pool: &PgPool, level: CefrLevel, per_key: usize) {
    for question_type in QuestionType::ALL {
        for i in 0..per_key {
            seed_question(pool, question_type, level, &format!("seed-{i}")).await;
        }
    }
}

/// The skill areas present in a composed session response, in order.
pub fn skill_areas_of(session: &Value) -> Vec<String> {
    session["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["skill_area"].as_str().unwrap().to_string())
        .collect()
}

/// Assert the standard error envelope and return its message.
pub fn assert_error_code(json: &Value, code: &str) -> String {
    assert_eq!(json["code"], code, "unexpected error code in {json}");
    json["error"].as_str().unwrap().to_string()
}

/// All four wire-form skill names, canonical order.
pub fn all_skill_area_names() -> Vec<&'static str> {
    SkillArea::ALL.iter().map(|s| s.as_str()).collect()
}
