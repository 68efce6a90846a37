//! Integration tests for the admin surface: inventory inspection and
//! top-up, and the premium flag.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, get_as, get_as_admin, post_json_as,
    post_json_as_admin, put_json_as_admin, seed_question, user_id_of, StubGenerator, TEST_USER,
};
use lingo_api::config::PracticeConfig;
use lingo_core::levels::CefrLevel;
use lingo_core::skills::QuestionType;
use serde_json::{json, Value};
use sqlx::PgPool;

fn ensure_body(skill_area: &str, question_type: &str, cefr_level: &str) -> Value {
    json!({
        "skill_area": skill_area,
        "question_type": question_type,
        "cefr_level": cefr_level,
    })
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_surface_requires_the_admin_role(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/admin/inventory").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_as(app.clone(), TEST_USER, "/api/v1/admin/inventory").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    common::assert_error_code(&json, "FORBIDDEN");

    let response = post_json_as(
        app.clone(),
        TEST_USER,
        "/api/v1/admin/inventory/ensure",
        ensure_body("speaking", "read_aloud", "A1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_as_admin(app, "ops-1", "/api/v1/admin/users/1/premium", json!({"is_premium": true})).await;
    // Admin role present, so this gets past the gate (404 is the user check).
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Inventory ensure
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ensure_tops_up_an_empty_key(pool: PgPool) {
    let app = build_test_app_with(pool, PracticeConfig::default(), StubGenerator::ok());

    // Lowercase level exercises the case-insensitive parse.
    let response = post_json_as_admin(
        app.clone(),
        "ops-1",
        "/api/v1/admin/inventory/ensure",
        ensure_body("speaking", "read_aloud", "b1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let report = &json["data"];
    assert_eq!(report["skill_area"], "speaking");
    assert_eq!(report["question_type"], "read_aloud");
    assert_eq!(report["cefr_level"], "B1");
    assert_eq!(report["available_before"], 0);
    assert_eq!(report["requested"], 10);
    assert_eq!(report["generated"], 10);
    assert!(report["errors"].as_array().unwrap().is_empty());

    let response = get_as_admin(app, "ops-1", "/api/v1/admin/inventory").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cefr_level"], 3);
    assert_eq!(rows[0]["available"], 10);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ensure_skips_a_key_already_at_the_floor(pool: PgPool) {
    let generator = StubGenerator::ok();
    let app = build_test_app_with(pool.clone(), PracticeConfig::default(), generator.clone());

    for i in 0..5 {
        seed_question(
            &pool,
            QuestionType::ListenAndChoose,
            CefrLevel::A1,
            &format!("stock-{i}"),
        )
        .await;
    }

    let response = post_json_as_admin(
        app,
        "ops-1",
        "/api/v1/admin/inventory/ensure",
        ensure_body("listening", "listen_and_choose", "A1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["available_before"], 5);
    assert_eq!(json["data"]["requested"], 0);
    assert_eq!(json["data"]["generated"], 0);
    assert_eq!(generator.calls(), 0, "nothing was generated");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_generation_failures_are_reported_not_fatal(pool: PgPool) {
    let app = build_test_app_with(
        pool,
        PracticeConfig::default(),
        StubGenerator::fail_every_nth(2),
    );

    let response = post_json_as_admin(
        app.clone(),
        "ops-1",
        "/api/v1/admin/inventory/ensure",
        json!({
            "skill_area": "writing",
            "question_type": "respond_to_prompt",
            "cefr_level": "A2",
            "min_count": 6,
            "topup_count": 6,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let report = &json["data"];
    assert_eq!(report["requested"], 6);
    assert_eq!(report["generated"], 3, "every second call failed");
    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].as_str().unwrap().contains("scripted failure"));

    // The successes were stored.
    let response = get_as_admin(app, "ops-1", "/api/v1/admin/inventory").await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["available"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ensure_validates_counts_and_key(pool: PgPool) {
    let app = build_test_app(pool);
    let uri = "/api/v1/admin/inventory/ensure";

    for (body, fragment) in [
        (
            json!({
                "skill_area": "speaking",
                "question_type": "read_aloud",
                "cefr_level": "A1",
                "topup_count": 0,
            }),
            "between 1 and 20",
        ),
        (
            json!({
                "skill_area": "speaking",
                "question_type": "read_aloud",
                "cefr_level": "A1",
                "topup_count": 21,
            }),
            "between 1 and 20",
        ),
        (
            json!({
                "skill_area": "speaking",
                "question_type": "read_aloud",
                "cefr_level": "A1",
                "min_count": -1,
            }),
            "min_count",
        ),
        (
            ensure_body("speaking", "fill_in_the_blank", "A1"),
            "belongs to skill area",
        ),
        (ensure_body("speaking", "read_aloud", "Z9"), "A1, A2"),
    ] {
        let response = post_json_as_admin(app.clone(), "ops-1", uri, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        let message = common::assert_error_code(&json, "VALIDATION_ERROR");
        assert!(message.contains(fragment), "got: {message}");
    }
}

// ---------------------------------------------------------------------------
// Premium flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn premium_flag_round_trips(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let user_id = user_id_of(&pool, TEST_USER).await;
    let uri = format!("/api/v1/admin/users/{user_id}/premium");

    let response = put_json_as_admin(app.clone(), "ops-1", &uri, json!({"is_premium": true})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_premium"], true);

    let response = get_as(app.clone(), TEST_USER, "/api/v1/practice/usage").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["unlimited"], true);

    let response = put_json_as_admin(app.clone(), "ops-1", &uri, json!({"is_premium": false})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(app, TEST_USER, "/api/v1/practice/usage").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["unlimited"], false);
    assert_eq!(json["data"]["remaining"], 10);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn premium_for_an_unknown_user_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);

    let response = put_json_as_admin(
        app,
        "ops-1",
        "/api/v1/admin/users/999999/premium",
        json!({"is_premium": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    common::assert_error_code(&json, "NOT_FOUND");
}
