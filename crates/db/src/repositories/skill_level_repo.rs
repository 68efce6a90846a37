//! Repository for the `user_skill_levels` table.
//!
//! Level mutation goes through [`SkillLevelRepo::apply_graded_outcome`],
//! which runs the pure state machine inside a short per-key transaction.
//! Concurrent outcomes for the same (user, skill, type) serialize on the
//! row lock; different keys never interact.

use lingo_core::levels::CefrLevel;
use lingo_core::progression::{apply_outcome, AttemptOutcome, LevelChange, LevelProgress, ProgressionPolicy};
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::models::skill_level::UserSkillLevel;

/// Column list for `user_skill_levels` queries.
const COLUMNS: &str = "\
    id, user_id, skill_area, question_type, cefr_level, \
    attempts_at_level, correct_streak, created_at, updated_at";

/// Provides level tracking per (user, skill area, question type).
pub struct SkillLevelRepo;

impl SkillLevelRepo {
    /// Fetch the level row for a key, creating it at the starting level on
    /// first sight. Reading a level is never an error for a fresh key.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        skill_area: SkillArea,
        question_type: QuestionType,
    ) -> Result<UserSkillLevel, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_skill_levels (user_id, skill_area, question_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, skill_area, question_type) DO NOTHING",
        )
        .bind(user_id)
        .bind(skill_area.as_str())
        .bind(question_type.as_str())
        .execute(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM user_skill_levels \
             WHERE user_id = $1 AND skill_area = $2 AND question_type = $3"
        );
        sqlx::query_as::<_, UserSkillLevel>(&query)
            .bind(user_id)
            .bind(skill_area.as_str())
            .bind(question_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// List all level rows for a user, ordered by skill area then type.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSkillLevel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_skill_levels \
             WHERE user_id = $1 \
             ORDER BY skill_area, question_type"
        );
        sqlx::query_as::<_, UserSkillLevel>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply one graded outcome to the key's level state.
    ///
    /// Ensures the row exists, locks it, runs the pure promotion/demotion
    /// machine, and writes the result back, all in one transaction. Any
    /// store failure propagates; the caller must surface it rather than
    /// guess at the resulting level.
    pub async fn apply_graded_outcome(
        pool: &PgPool,
        user_id: DbId,
        skill_area: SkillArea,
        question_type: QuestionType,
        outcome: AttemptOutcome,
        policy: &ProgressionPolicy,
    ) -> Result<(UserSkillLevel, LevelChange), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_skill_levels (user_id, skill_area, question_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, skill_area, question_type) DO NOTHING",
        )
        .bind(user_id)
        .bind(skill_area.as_str())
        .bind(question_type.as_str())
        .execute(&mut *tx)
        .await?;

        let select = format!(
            "SELECT {COLUMNS} FROM user_skill_levels \
             WHERE user_id = $1 AND skill_area = $2 AND question_type = $3 \
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, UserSkillLevel>(&select)
            .bind(user_id)
            .bind(skill_area.as_str())
            .bind(question_type.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let level = CefrLevel::from_ordinal(row.cefr_level).ok_or_else(|| {
            sqlx::Error::Decode(
                format!("stored cefr_level {} is outside A1..C2", row.cefr_level).into(),
            )
        })?;
        let transition = apply_outcome(
            LevelProgress {
                level,
                attempts_at_level: row.attempts_at_level,
                correct_streak: row.correct_streak,
            },
            outcome,
            policy,
        );

        let update = format!(
            "UPDATE user_skill_levels \
             SET cefr_level = $2, attempts_at_level = $3, correct_streak = $4, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, UserSkillLevel>(&update)
            .bind(row.id)
            .bind(transition.progress.level.ordinal())
            .bind(transition.progress.attempts_at_level)
            .bind(transition.progress.correct_streak)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((updated, transition.change))
    }
}
