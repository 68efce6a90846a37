//! Per-skill level-tracking model and snapshot DTO.

use lingo_core::levels::CefrLevel;
use lingo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_skill_levels` table.
///
/// `cefr_level` holds the ordinal 1..6 of A1..C2; use
/// [`LevelSnapshot::from_row`] to derive the string form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSkillLevel {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: i16,
    pub attempts_at_level: i32,
    pub correct_streak: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// API-facing view of one level row, with the CEFR string derived from
/// the stored ordinal so the two representations can never diverge.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSnapshot {
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: String,
    pub numeric_level: i16,
    pub attempts_at_level: i32,
    pub correct_streak: i32,
}

impl LevelSnapshot {
    /// Returns `None` when the stored ordinal is outside A1..C2.
    pub fn from_row(row: &UserSkillLevel) -> Option<LevelSnapshot> {
        let level = CefrLevel::from_ordinal(row.cefr_level)?;
        Some(LevelSnapshot {
            skill_area: row.skill_area.clone(),
            question_type: row.question_type.clone(),
            cefr_level: level.as_str().to_string(),
            numeric_level: level.ordinal(),
            attempts_at_level: row.attempts_at_level,
            correct_streak: row.correct_streak,
        })
    }
}
