//! Route definitions for the practice surface.
//!
//! All endpoints require identity.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::practice;
use crate::state::AppState;

/// Routes mounted at `/practice`.
///
/// ```text
/// POST   /session               -> compose_session
/// GET    /usage                 -> check_usage
/// POST   /attempts              -> submit_attempt
/// POST   /attempts/{id}/grade   -> grade_attempt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(practice::compose_session))
        .route("/usage", get(practice::check_usage))
        .route("/attempts", post(practice::submit_attempt))
        .route("/attempts/{id}/grade", post(practice::grade_attempt))
}
