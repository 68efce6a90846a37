//! Route definitions for the per-skill level surface.
//!
//! All endpoints require identity.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::levels;
use crate::state::AppState;

/// Routes mounted at `/user/levels`.
///
/// ```text
/// GET    /                              -> get_all_levels
/// GET    /{skill_area}/{question_type}  -> get_level
/// POST   /record-outcome                -> record_outcome
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(levels::get_all_levels))
        .route("/{skill_area}/{question_type}", get(levels::get_level))
        .route("/record-outcome", post(levels::record_outcome))
}
