//! Handlers for the per-skill level surface.
//!
//! All endpoints require identity via [`RequireAuth`]. Level keys arrive as
//! strings and are parsed exactly once here; everything below works with
//! the typed forms.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use lingo_core::error::CoreError;
use lingo_core::progression::{AttemptOutcome, LevelChange};
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_db::models::skill_level::{LevelSnapshot, UserSkillLevel};
use lingo_db::repositories::SkillLevelRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::identity::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// DTO for recording a graded outcome directly against a level key.
#[derive(Debug, Deserialize)]
pub struct RecordOutcomeRequest {
    pub skill_area: String,
    pub question_type: String,
    /// `correct` or `incorrect`.
    pub outcome: String,
}

/// Level snapshots grouped by skill area. Areas the user has never
/// practiced serialize as empty lists.
#[derive(Debug, Default, Serialize)]
pub struct GroupedLevels {
    pub speaking: Vec<LevelSnapshot>,
    pub listening: Vec<LevelSnapshot>,
    pub reading: Vec<LevelSnapshot>,
    pub writing: Vec<LevelSnapshot>,
}

impl GroupedLevels {
    fn push(&mut self, skill_area: SkillArea, snapshot: LevelSnapshot) {
        match skill_area {
            SkillArea::Speaking => self.speaking.push(snapshot),
            SkillArea::Listening => self.listening.push(snapshot),
            SkillArea::Reading => self.reading.push(snapshot),
            SkillArea::Writing => self.writing.push(snapshot),
        }
    }
}

/// What recording an outcome did to the key's level.
#[derive(Debug, Serialize)]
pub struct OutcomeResult {
    pub level: LevelSnapshot,
    pub change: LevelChange,
}

// ---------------------------------------------------------------------------
// Shared parsing helpers
// ---------------------------------------------------------------------------

/// Parse and cross-check a (skill area, question type) key from its wire
/// strings. A type that belongs to a different area is a 400, not a fresh
/// level row under a nonsense key.
pub(crate) fn parse_level_key(
    skill_area: &str,
    question_type: &str,
) -> Result<(SkillArea, QuestionType), AppError> {
    let skill_area: SkillArea = skill_area.parse()?;
    let question_type: QuestionType = question_type.parse()?;
    if question_type.skill_area() != skill_area {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Question type '{question_type}' belongs to skill area '{}', not '{skill_area}'",
            question_type.skill_area()
        ))));
    }
    Ok((skill_area, question_type))
}

/// Project a stored level row to its API snapshot; an out-of-range stored
/// ordinal is corruption, not a client error.
pub(crate) fn snapshot_of(row: &UserSkillLevel) -> Result<LevelSnapshot, AppError> {
    LevelSnapshot::from_row(row).ok_or_else(|| {
        AppError::InternalError(format!(
            "stored cefr_level {} is outside A1..C2",
            row.cefr_level
        ))
    })
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/user/levels
///
/// All of the user's level records, grouped by skill area.
pub async fn get_all_levels(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let rows = SkillLevelRepo::list_for_user(&state.pool, user.id).await?;

    let mut grouped = GroupedLevels::default();
    for row in &rows {
        let skill_area: SkillArea = row.skill_area.parse().map_err(|_| {
            AppError::InternalError(format!("stored skill area '{}' is unknown", row.skill_area))
        })?;
        grouped.push(skill_area, snapshot_of(row)?);
    }

    Ok(Json(DataResponse { data: grouped }))
}

/// GET /api/v1/user/levels/{skill_area}/{question_type}
///
/// The level for one key, created at the starting level on first read.
pub async fn get_level(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path((skill_area, question_type)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let (skill_area, question_type) = parse_level_key(&skill_area, &question_type)?;

    let row = SkillLevelRepo::get_or_create(&state.pool, user.id, skill_area, question_type).await?;
    let snapshot = snapshot_of(&row)?;

    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/user/levels/record-outcome
///
/// Fold one graded outcome into a key's level state.
pub async fn record_outcome(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<RecordOutcomeRequest>,
) -> AppResult<impl IntoResponse> {
    let user = identity.resolve(&state.pool).await?;
    let (skill_area, question_type) = parse_level_key(&input.skill_area, &input.question_type)?;
    let outcome: AttemptOutcome = input.outcome.parse()?;

    let (row, change) = SkillLevelRepo::apply_graded_outcome(
        &state.pool,
        user.id,
        skill_area,
        question_type,
        outcome,
        &state.practice.policy,
    )
    .await?;
    let level = snapshot_of(&row)?;

    tracing::info!(
        user_id = user.id,
        %skill_area,
        %question_type,
        %outcome,
        change = ?change,
        "Level outcome recorded",
    );

    Ok(Json(DataResponse {
        data: OutcomeResult { level, change },
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
