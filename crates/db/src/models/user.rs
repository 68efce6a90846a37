//! Learner profile model.

use lingo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `external_ref` is the opaque identity handed down by the upstream
/// verification layer; profiles are created lazily the first time a new
/// identity shows up.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub external_ref: String,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
