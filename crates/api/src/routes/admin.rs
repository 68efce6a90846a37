//! Route definitions for the admin surface.
//!
//! All endpoints require the `admin` role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /inventory              -> get_inventory
/// POST   /inventory/ensure       -> ensure_inventory
/// PUT    /users/{id}/premium     -> set_premium
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(admin::get_inventory))
        .route("/inventory/ensure", post(admin::ensure_inventory))
        .route("/users/{id}/premium", put(admin::set_premium))
}
