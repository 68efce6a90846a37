//! Repository for the `users` table.

use lingo_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, external_ref, display_name, created_at, updated_at";

/// Provides lookup and lazy creation of learner profiles.
pub struct UserRepo;

impl UserRepo {
    /// Resolve a verified identity to a profile row, creating it on first
    /// contact.
    ///
    /// A single round trip: the conflict arm only bumps `updated_at`, so an
    /// existing profile's display name is never clobbered by later requests.
    pub async fn get_or_create(
        pool: &PgPool,
        external_ref: &str,
        display_name: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_ref, display_name) \
             VALUES ($1, $2) \
             ON CONFLICT (external_ref) DO UPDATE SET updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(external_ref)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    /// Look up a profile by its verified identity, if one exists.
    pub async fn find_by_external_ref(
        pool: &PgPool,
        external_ref: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE external_ref = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(external_ref)
            .fetch_optional(pool)
            .await
    }

    /// Look up a profile by primary key.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
