//! Integration tests for the per-skill level surface.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_as, post_json_as, TEST_USER};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn fresh_key_reads_the_starting_level(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_as(app, TEST_USER, "/api/v1/user/levels/speaking/read_aloud").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let level = &json["data"];
    assert_eq!(level["skill_area"], "speaking");
    assert_eq!(level["question_type"], "read_aloud");
    assert_eq!(level["cefr_level"], "A1");
    assert_eq!(level["numeric_level"], 1);
    assert_eq!(level["attempts_at_level"], 0);
    assert_eq!(level["correct_streak"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_skill_area_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_as(app, TEST_USER, "/api/v1/user/levels/telepathy/read_aloud").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = common::assert_error_code(&json, "VALIDATION_ERROR");
    assert!(message.contains("speaking"), "lists valid areas: {message}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mismatched_key_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    // read_aloud is a speaking format; pairing it with listening is a
    // client error, not a fresh level row under a nonsense key.
    let response = get_as(
        app.clone(),
        TEST_USER,
        "/api/v1/user/levels/listening/read_aloud",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = common::assert_error_code(&json, "VALIDATION_ERROR");
    assert!(message.contains("'speaking'"), "got: {message}");

    let response = get_as(app, TEST_USER, "/api/v1/user/levels").await;
    let json = body_json(response).await;
    assert!(json["data"]["listening"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recorded_outcomes_walk_the_level_up_and_back_down(pool: PgPool) {
    let app = build_test_app(pool);
    let uri = "/api/v1/user/levels/record-outcome";
    let outcome = |o: &str| {
        json!({
            "skill_area": "listening",
            "question_type": "listen_and_choose",
            "outcome": o,
        })
    };

    // Three straight corrects promote A1 -> A2.
    for round in 1..=3 {
        let response = post_json_as(app.clone(), TEST_USER, uri, outcome("correct")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let expected = if round == 3 { "promoted" } else { "unchanged" };
        assert_eq!(json["data"]["change"], expected, "round {round}");
    }

    // Five attempts at A2 without a completed streak demote back.
    for round in 1..=5 {
        let response = post_json_as(app.clone(), TEST_USER, uri, outcome("incorrect")).await;
        let json = body_json(response).await;
        let expected = if round == 5 { "demoted" } else { "unchanged" };
        assert_eq!(json["data"]["change"], expected, "round {round}");
    }

    let response = get_as(app, TEST_USER, "/api/v1/user/levels/listening/listen_and_choose").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["cefr_level"], "A1");
    assert_eq!(json["data"]["attempts_at_level"], 0);
    assert_eq!(json["data"]["correct_streak"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_outcome_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json_as(
        app,
        TEST_USER,
        "/api/v1/user/levels/record-outcome",
        json!({
            "skill_area": "reading",
            "question_type": "fill_in_the_blank",
            "outcome": "perfect",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = common::assert_error_code(&json, "VALIDATION_ERROR");
    assert!(message.contains("correct, incorrect"), "got: {message}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn levels_come_back_grouped_by_skill_area(pool: PgPool) {
    let app = build_test_app(pool);

    // Touch two keys; the other two areas stay untouched.
    for uri in [
        "/api/v1/user/levels/speaking/describe_image",
        "/api/v1/user/levels/reading/fill_in_the_blank",
    ] {
        let response = get_as(app.clone(), TEST_USER, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_as(app, TEST_USER, "/api/v1/user/levels").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let grouped = &json["data"];
    assert_eq!(grouped["speaking"].as_array().unwrap().len(), 1);
    assert_eq!(grouped["reading"].as_array().unwrap().len(), 1);
    assert!(grouped["listening"].as_array().unwrap().is_empty());
    assert!(grouped["writing"].as_array().unwrap().is_empty());
    assert_eq!(grouped["speaking"][0]["question_type"], "describe_image");
}
