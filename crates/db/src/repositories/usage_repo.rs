//! Repository for the `free_tier_usage` table.
//!
//! The session gate is a single conditional upsert so two racing requests
//! for the last free unit resolve to exactly one winner at the row level.

use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::models::usage::{FreeTierUsage, UsageDecision};

/// Column list for `free_tier_usage` queries.
const COLUMNS: &str = "user_id, session_count, is_premium, created_at, updated_at";

/// Provides the atomic session gate and premium-flag maintenance.
pub struct UsageRepo;

impl UsageRepo {
    /// Check the free-tier quota and consume one unit, atomically.
    ///
    /// One statement: a first-time user gets a row at count 1; a premium
    /// user is allowed through without incrementing; a free user below the
    /// limit is incremented. When the conflict arm's guard fails (free
    /// user at the limit) no row comes back and nothing was mutated.
    pub async fn check_and_increment(
        pool: &PgPool,
        user_id: DbId,
        limit: i32,
    ) -> Result<UsageDecision, sqlx::Error> {
        let query = format!(
            "INSERT INTO free_tier_usage (user_id, session_count) \
             VALUES ($1, 1) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 session_count = CASE \
                     WHEN free_tier_usage.is_premium THEN free_tier_usage.session_count \
                     ELSE free_tier_usage.session_count + 1 \
                 END, \
                 updated_at = NOW() \
             WHERE free_tier_usage.is_premium OR free_tier_usage.session_count < $2 \
             RETURNING {COLUMNS}"
        );
        let granted = sqlx::query_as::<_, FreeTierUsage>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_optional(pool)
            .await?;

        match granted {
            Some(row) => Ok(UsageDecision {
                allowed: true,
                session_count: row.session_count,
                is_premium: row.is_premium,
            }),
            None => {
                // Denied: the row exists and sits at the limit, untouched.
                let row = Self::fetch(pool, user_id).await?;
                Ok(UsageDecision {
                    allowed: false,
                    session_count: row.session_count,
                    is_premium: row.is_premium,
                })
            }
        }
    }

    /// Read the usage row without consuming anything.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<FreeTierUsage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM free_tier_usage WHERE user_id = $1");
        sqlx::query_as::<_, FreeTierUsage>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the premium flag, creating the row if the user has never
    /// practiced. The billing-reconciliation write surface.
    pub async fn set_premium(
        pool: &PgPool,
        user_id: DbId,
        is_premium: bool,
    ) -> Result<FreeTierUsage, sqlx::Error> {
        let query = format!(
            "INSERT INTO free_tier_usage (user_id, is_premium) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 is_premium = EXCLUDED.is_premium, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FreeTierUsage>(&query)
            .bind(user_id)
            .bind(is_premium)
            .fetch_one(pool)
            .await
    }

    async fn fetch(pool: &PgPool, user_id: DbId) -> Result<FreeTierUsage, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM free_tier_usage WHERE user_id = $1");
        sqlx::query_as::<_, FreeTierUsage>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
