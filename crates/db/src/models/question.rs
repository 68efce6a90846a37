//! Question inventory models and DTOs.

use lingo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: i16,
    pub prompt: String,
    pub preparation_secs: i32,
    pub min_response_secs: i32,
    pub max_response_secs: i32,
    pub media_url: Option<String>,
    pub metadata: JsonValue,
    pub published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a newly generated question.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: i16,
    pub prompt: String,
    pub preparation_secs: i32,
    pub min_response_secs: i32,
    pub max_response_secs: i32,
    pub media_url: Option<String>,
    pub metadata: JsonValue,
}

/// One aggregate row of the inventory snapshot: how many published
/// questions exist for a (skill, type, level) key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryRow {
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: i16,
    pub available: i64,
}
