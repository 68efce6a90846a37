//! Repository for the `questions` table.
//!
//! The composer reads a bounded candidate window and picks uniformly in
//! memory; replenishment is insert-only, so per-key availability only ever
//! grows.

use lingo_core::levels::CefrLevel;
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{InventoryRow, NewQuestion, Question};

/// Column list for `questions` queries.
const COLUMNS: &str = "\
    id, skill_area, question_type, cefr_level, prompt, \
    preparation_secs, min_response_secs, max_response_secs, \
    media_url, metadata, published, created_at, updated_at";

/// Provides candidate draws and inventory maintenance for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Fetch up to `window` published questions for a key, newest first,
    /// skipping the excluded ids. The uniform pick over the window happens
    /// in the caller so the query cost stays bounded.
    pub async fn draw_candidates(
        pool: &PgPool,
        skill_area: SkillArea,
        question_type: QuestionType,
        level: CefrLevel,
        excluded_ids: &[DbId],
        window: i64,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions \
             WHERE skill_area = $1 AND question_type = $2 AND cefr_level = $3 \
               AND published AND id <> ALL($4) \
             ORDER BY id DESC \
             LIMIT $5"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(skill_area.as_str())
            .bind(question_type.as_str())
            .bind(level.ordinal())
            .bind(excluded_ids)
            .bind(window)
            .fetch_all(pool)
            .await
    }

    /// Count published questions for a key.
    pub async fn count_for_key(
        pool: &PgPool,
        skill_area: SkillArea,
        question_type: QuestionType,
        level: CefrLevel,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM questions \
             WHERE skill_area = $1 AND question_type = $2 AND cefr_level = $3 \
               AND published",
        )
        .bind(skill_area.as_str())
        .bind(question_type.as_str())
        .bind(level.ordinal())
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Insert one generated question.
    pub async fn insert_generated(
        pool: &PgPool,
        question: &NewQuestion,
    ) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions \
                 (skill_area, question_type, cefr_level, prompt, \
                  preparation_secs, min_response_secs, max_response_secs, \
                  media_url, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(&question.skill_area)
            .bind(&question.question_type)
            .bind(question.cefr_level)
            .bind(&question.prompt)
            .bind(question.preparation_secs)
            .bind(question.min_response_secs)
            .bind(question.max_response_secs)
            .bind(&question.media_url)
            .bind(&question.metadata)
            .fetch_one(pool)
            .await
    }

    /// Per-key availability counts over published questions, ordered so the
    /// snapshot is stable.
    pub async fn inventory_snapshot(pool: &PgPool) -> Result<Vec<InventoryRow>, sqlx::Error> {
        let query = "\
            SELECT skill_area, question_type, cefr_level, COUNT(*)::BIGINT AS available \
            FROM questions \
            WHERE published \
            GROUP BY skill_area, question_type, cefr_level \
            ORDER BY skill_area, question_type, cefr_level";
        sqlx::query_as::<_, InventoryRow>(query).fetch_all(pool).await
    }
}
