//! Free-tier usage model and the session-gate decision.

use lingo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `free_tier_usage` table (one per user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FreeTierUsage {
    pub user_id: DbId,
    pub session_count: i32,
    pub is_premium: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outcome of the atomic session gate.
///
/// When `allowed` is false no mutation happened and `session_count` is the
/// unchanged counter that hit the limit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsageDecision {
    pub allowed: bool,
    pub session_count: i32,
    pub is_premium: bool,
}
