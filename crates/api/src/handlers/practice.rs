//! Handlers for the practice surface: session composition, the usage
//! gate, and attempt recording/grading.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lingo_core::error::CoreError;
use lingo_core::progression::{AttemptOutcome, LevelChange};
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_db::models::attempt::{Attempt, RecordedOutcome, SubmitAttempt};
use lingo_db::models::skill_level::LevelSnapshot;
use lingo_db::models::usage::FreeTierUsage;
use lingo_db::repositories::{AttemptRepo, SkillLevelRepo, UsageRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::composer::SessionComposer;
use crate::error::{AppError, AppResult};
use crate::handlers::levels::snapshot_of;
use crate::identity::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Quota standing reported by `GET /practice/usage`.
#[derive(Debug, PartialEq, Serialize)]
pub struct UsageStatus {
    /// Whether the next session request would pass the gate.
    pub allowed: bool,
    pub used: i32,
    pub limit: i32,
    /// Sessions left before the gate closes; `null` for premium users.
    pub remaining: Option<i32>,
    pub unlimited: bool,
}

impl UsageStatus {
    fn derive(row: Option<&FreeTierUsage>, limit: i32) -> Self {
        let (used, premium) = row.map_or((0, false), |r| (r.session_count, r.is_premium));
        if premium {
            UsageStatus {
                allowed: true,
                used,
                limit,
                remaining: None,
                unlimited: true,
            }
        } else {
            UsageStatus {
                allowed: used < limit,
                used,
                limit,
                remaining: Some((limit - used).max(0)),
                unlimited: false,
            }
        }
    }
}

/// What a grading write did: the stored attempt plus the level state the
/// outcome moved (or held).
#[derive(Debug, Serialize)]
pub struct GradeResult {
    pub attempt: Attempt,
    pub level: LevelSnapshot,
    pub change: LevelChange,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/practice/session
///
/// Compose an adaptive practice session, consuming one free-session unit.
pub async fn compose_session(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let session = SessionComposer::new(&state).compose(user.id).await?;

    tracing::info!(
        user_id = user.id,
        session_id = %session.session_id,
        questions = session.questions.len(),
        "Practice session composed",
    );

    Ok(Json(DataResponse { data: session }))
}

/// GET /api/v1/practice/usage
///
/// The user's quota standing. Read-only; never consumes a unit.
pub async fn check_usage(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let row = UsageRepo::get(&state.pool, user.id).await?;
    let status = UsageStatus::derive(row.as_ref(), state.practice.free_session_limit);

    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/practice/attempts
///
/// Record an attempt. Answers 201 on first write; a retried submission
/// answers 200 with the originally stored row.
pub async fn submit_attempt(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<SubmitAttempt>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let (attempt, written) = AttemptRepo::insert(&state.pool, user.id, &input).await?;
    if attempt.user_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Attempt belongs to a different user".into(),
        )));
    }

    if written {
        tracing::info!(
            user_id = user.id,
            attempt_id = %attempt.id,
            question_id = attempt.question_id,
            "Attempt recorded",
        );
    }

    let status = if written { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(DataResponse { data: attempt })))
}

/// POST /api/v1/practice/attempts/{id}/grade
///
/// Backfill grading results onto an attempt and fold the outcome into the
/// key's level, exactly once per attempt. A second grade answers 409.
pub async fn grade_attempt(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RecordedOutcome>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let outcome: AttemptOutcome = input.outcome.parse()?;

    let attempt = AttemptRepo::get(&state.pool, id)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    if attempt.user_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Attempt belongs to a different user".into(),
        )));
    }

    let graded = AttemptRepo::record_grading(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!("Attempt {id} is already graded")))
        })?;

    let skill_area: SkillArea = graded.skill_area.parse().map_err(|_| {
        AppError::InternalError(format!(
            "attempt {id} carries unknown skill area '{}'",
            graded.skill_area
        ))
    })?;
    let question_type: QuestionType = graded.question_type.parse().map_err(|_| {
        AppError::InternalError(format!(
            "attempt {id} carries unknown question type '{}'",
            graded.question_type
        ))
    })?;

    let (level_row, change) = SkillLevelRepo::apply_graded_outcome(
        &state.pool,
        user.id,
        skill_area,
        question_type,
        outcome,
        &state.practice.policy,
    )
    .await?;
    let level = snapshot_of(&level_row)?;

    tracing::info!(
        user_id = user.id,
        attempt_id = %id,
        %outcome,
        change = ?change,
        "Attempt graded",
    );

    Ok(Json(DataResponse {
        data: GradeResult {
            attempt: graded,
            level,
            change,
        },
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
