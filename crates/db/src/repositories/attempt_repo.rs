//! Repository for the `attempts` table.
//!
//! Attempts are append-only from the submission side; the external grading
//! flow backfills transcript, score and feedback later. A graded attempt
//! is one whose `score` is non-NULL.

use lingo_core::skills::SkillArea;
use lingo_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::attempt::{Attempt, RecordedOutcome, SkillScoreRow, SubmitAttempt};

/// Column list for `attempts` queries.
const COLUMNS: &str = "\
    id, session_id, user_id, question_id, skill_area, question_type, \
    prompt_snapshot, response_url, transcript, score, feedback, \
    created_at, updated_at";

/// Provides recording, history and aggregate queries for attempts.
pub struct AttemptRepo;

impl AttemptRepo {
    /// Record an attempt idempotently.
    ///
    /// The key, prompt snapshot and skill columns are copied from the
    /// question row in the same statement. A retried submission finds the
    /// existing row instead of inserting; the returned flag is true only
    /// when this call wrote the row. An unknown question id surfaces as
    /// `RowNotFound`.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        attempt: &SubmitAttempt,
    ) -> Result<(Attempt, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO attempts \
                 (id, session_id, user_id, question_id, skill_area, question_type, \
                  prompt_snapshot, response_url) \
             SELECT $1, $2, $3, q.id, q.skill_area, q.question_type, q.prompt, $4 \
             FROM questions q WHERE q.id = $5 \
             ON CONFLICT (id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, Attempt>(&insert)
            .bind(attempt.id)
            .bind(attempt.session_id)
            .bind(user_id)
            .bind(&attempt.response_url)
            .bind(attempt.question_id)
            .fetch_optional(pool)
            .await?;
        if let Some(row) = written {
            return Ok((row, true));
        }
        // Either a replay of an existing attempt or an unknown question.
        let existing = Self::get(pool, attempt.id).await?;
        existing.map(|row| (row, false)).ok_or(sqlx::Error::RowNotFound)
    }

    /// Look up one attempt by its client-supplied id.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Attempt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attempts WHERE id = $1");
        sqlx::query_as::<_, Attempt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Question ids of the user's most recent attempts in a skill area
    /// within the trailing window, newest first. This is the repeat
    /// exclusion set for a draw.
    pub async fn recent_question_ids(
        pool: &PgPool,
        user_id: DbId,
        skill_area: SkillArea,
        window_days: i32,
        max: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT question_id FROM attempts \
             WHERE user_id = $1 AND skill_area = $2 \
               AND created_at >= NOW() - make_interval(days => $3) \
             ORDER BY created_at DESC \
             LIMIT $4",
        )
        .bind(user_id)
        .bind(skill_area.as_str())
        .bind(window_days)
        .bind(max)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Lifetime count of the user's graded attempts. Drives the cold-start
    /// check in session composition.
    pub async fn graded_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attempts WHERE user_id = $1 AND score IS NOT NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Average score and attempt count per skill area over the user's
    /// graded attempts in the trailing window. The ranking input.
    pub async fn skill_score_aggregates(
        pool: &PgPool,
        user_id: DbId,
        window_days: i32,
    ) -> Result<Vec<SkillScoreRow>, sqlx::Error> {
        let query = "\
            SELECT skill_area, \
                   AVG(score)::FLOAT8 AS avg_score, \
                   COUNT(*)::BIGINT AS attempt_count \
            FROM attempts \
            WHERE user_id = $1 AND score IS NOT NULL \
              AND created_at >= NOW() - make_interval(days => $2) \
            GROUP BY skill_area \
            ORDER BY skill_area";
        sqlx::query_as::<_, SkillScoreRow>(query)
            .bind(user_id)
            .bind(window_days)
            .fetch_all(pool)
            .await
    }

    /// Backfill grading results onto an ungraded attempt.
    ///
    /// Returns `None` when the attempt was already graded (the caller
    /// treats that as a conflict, so a regrade can never advance a level
    /// twice) and `RowNotFound` behaviour is left to the caller via
    /// [`AttemptRepo::get`].
    pub async fn record_grading(
        pool: &PgPool,
        id: Uuid,
        outcome: &RecordedOutcome,
    ) -> Result<Option<Attempt>, sqlx::Error> {
        let query = format!(
            "UPDATE attempts \
             SET transcript = $2, score = $3, feedback = $4, updated_at = NOW() \
             WHERE id = $1 AND score IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attempt>(&query)
            .bind(id)
            .bind(&outcome.transcript)
            .bind(outcome.score)
            .bind(&outcome.feedback)
            .fetch_optional(pool)
            .await
    }
}
