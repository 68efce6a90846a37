pub mod admin;
pub mod health;
pub mod levels;
pub mod practice;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /practice/session                         compose a session (POST)
/// /practice/usage                           quota standing (GET)
/// /practice/attempts                        record an attempt (POST)
/// /practice/attempts/{id}/grade             backfill grading (POST)
///
/// /user/levels                              all levels, grouped (GET)
/// /user/levels/{skill_area}/{question_type} one level key (GET)
/// /user/levels/record-outcome               fold in an outcome (POST)
///
/// /admin/inventory                          stock per key (GET, admin only)
/// /admin/inventory/ensure                   top up one key (POST)
/// /admin/users/{id}/premium                 set premium flag (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/practice", practice::router())
        .nest("/user/levels", levels::router())
        .nest("/admin", admin::router())
}
