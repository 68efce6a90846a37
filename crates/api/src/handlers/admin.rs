//! Handlers for the admin surface: inventory inspection and maintenance,
//! and the billing-reconciliation premium flag.
//!
//! All endpoints require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use lingo_core::error::CoreError;
use lingo_core::levels::CefrLevel;
use lingo_core::types::DbId;
use lingo_db::repositories::{QuestionRepo, UsageRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::levels::parse_level_key;
use crate::identity::RequireAdmin;
use crate::inventory::{InventoryManager, MAX_GENERATION_PER_CALL};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for a manual inventory top-up of one key.
#[derive(Debug, Deserialize)]
pub struct EnsureInventoryRequest {
    pub skill_area: String,
    pub question_type: String,
    pub cefr_level: String,
    /// Stock floor to guarantee; defaults to the configured minimum.
    pub min_count: Option<i64>,
    /// Questions to request when below the floor; defaults to the
    /// configured top-up size.
    pub topup_count: Option<i64>,
}

/// DTO for setting a user's premium flag.
#[derive(Debug, Deserialize)]
pub struct SetPremiumRequest {
    pub is_premium: bool,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/inventory
///
/// Published stock per (skill area, question type, CEFR level) key.
pub async fn get_inventory(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = QuestionRepo::inventory_snapshot(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/admin/inventory/ensure
///
/// Top up one key when its stock is below the floor. Per-question
/// generation failures are reported in the response, not as an error
/// status.
pub async fn ensure_inventory(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<EnsureInventoryRequest>,
) -> AppResult<impl IntoResponse> {
    let (skill_area, question_type) = parse_level_key(&input.skill_area, &input.question_type)?;
    let cefr_level: CefrLevel = input.cefr_level.parse()?;

    let min_count = input.min_count.unwrap_or(state.practice.inventory_min_count);
    let topup_count = input
        .topup_count
        .unwrap_or(state.practice.inventory_topup_count);
    if min_count < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "min_count must not be negative".into(),
        )));
    }
    if !(1..=MAX_GENERATION_PER_CALL).contains(&topup_count) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "topup_count must be between 1 and {MAX_GENERATION_PER_CALL}"
        ))));
    }

    let manager = InventoryManager::new(&state.pool, state.generator.as_ref());
    let report = manager
        .ensure_inventory(skill_area, question_type, cefr_level, min_count, topup_count)
        .await?;

    tracing::info!(
        admin = %admin.external_ref,
        %skill_area,
        %question_type,
        %cefr_level,
        requested = report.requested,
        generated = report.generated,
        failures = report.errors.len(),
        "Inventory ensure completed",
    );

    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/admin/users/{id}/premium
///
/// Set a user's premium flag, creating the usage row if the user has
/// never practiced. The user itself must exist.
pub async fn set_premium(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<SetPremiumRequest>,
) -> AppResult<impl IntoResponse> {
    UserRepo::get(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user_id,
        }))?;

    let usage = UsageRepo::set_premium(&state.pool, user_id, input.is_premium).await?;

    tracing::info!(
        admin = %admin.external_ref,
        user_id,
        is_premium = input.is_premium,
        "Premium flag updated",
    );

    Ok(Json(DataResponse { data: usage }))
}
