//! Gateway-verified identity extractors for Axum handlers.
//!
//! The API sits behind a gateway that authenticates callers and forwards
//! the verified identity as headers. Each extractor wraps that identity and
//! rejects requests that fail its requirement, so authorization is enforced
//! at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lingo_core::error::CoreError;
use lingo_db::models::user::User;
use lingo_db::repositories::UserRepo;
use lingo_db::DbPool;

use crate::error::AppError;
use crate::state::AppState;

/// Required header carrying the caller's stable subject identifier.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Optional header carrying a display name for first contact.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Optional header carrying the caller's role; absent means `learner`.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Role name the gateway sends for operators of the admin surface.
pub const ROLE_ADMIN: &str = "admin";

/// Caller identity extracted from the gateway's identity headers.
///
/// Use this as an extractor parameter in any handler that needs to know who
/// is calling:
///
/// ```ignore
/// async fn my_handler(RequireAuth(identity): RequireAuth) -> AppResult<Json<()>> {
///     tracing::info!(user = %identity.external_ref, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    /// The stable subject identifier from the identity provider.
    pub external_ref: String,
    /// Display name, when the gateway forwarded one.
    pub display_name: Option<String>,
    /// Role name (e.g. `"learner"`, `"admin"`).
    pub role: String,
}

impl VerifiedUser {
    /// Load or lazily create the profile row this identity maps to.
    pub async fn resolve(&self, pool: &DbPool) -> Result<User, sqlx::Error> {
        UserRepo::get_or_create(pool, &self.external_ref, self.display_name.as_deref()).await
    }
}

impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let external_ref = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {USER_ID_HEADER} header"
                )))
            })?
            .to_string();

        let display_name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("learner")
            .to_string();

        Ok(VerifiedUser {
            external_ref,
            display_name,
            role,
        })
    }
}

/// Requires any verified caller. Rejects with 401 Unauthorized otherwise.
///
/// Functionally equivalent to [`VerifiedUser`] but named explicitly for use
/// in route handlers where the intent "this route requires identity" should
/// be self-documenting.
pub struct RequireAuth(pub VerifiedUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = VerifiedUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub VerifiedUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = VerifiedUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
