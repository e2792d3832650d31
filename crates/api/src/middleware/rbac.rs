//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wedsite_core::error::CoreError;
use wedsite_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the platform `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequirePlatformAdmin(user): RequirePlatformAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePlatformAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequirePlatformAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Platform admin role required".into(),
            )));
        }
        Ok(RequirePlatformAdmin(user))
    }
}
