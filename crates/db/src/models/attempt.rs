//! Practice-attempt models and DTOs.

use lingo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `attempts` table.
///
/// Inserted once per submission (the client-supplied `id` makes retries
/// idempotent); `transcript`, `score` and `feedback` stay NULL until the
/// external grading flow backfills them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attempt {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: DbId,
    pub question_id: DbId,
    pub skill_area: String,
    pub question_type: String,
    pub prompt_snapshot: String,
    pub response_url: Option<String>,
    pub transcript: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<JsonValue>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a practice attempt.
///
/// `id` is generated client-side so a retried submission lands on the
/// same row; `response_url` is an opaque reference to wherever the
/// client uploaded the recording, never media bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttempt {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: DbId,
    pub response_url: Option<String>,
}

/// DTO the external grading flow posts back for one attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedOutcome {
    pub transcript: Option<String>,
    pub score: f64,
    pub feedback: Option<JsonValue>,
    /// `correct` or `incorrect`, parsed at the boundary.
    pub outcome: String,
}

/// Per-skill score aggregate over a learner's recent graded attempts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkillScoreRow {
    pub skill_area: String,
    pub avg_score: f64,
    pub attempt_count: i64,
}
