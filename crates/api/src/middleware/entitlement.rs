//! Admin-panel entitlement gate.
//!
//! A request passes when, in order:
//!
//! 1. a bearer token is present (401 otherwise, before any database query),
//! 2. the token verifies and has not expired (401),
//! 3. the user exists and is active (401),
//! 4. the user is a platform admin, or holds an active grant for the template
//!    backed by a completed `ultimate` order (403 otherwise).
//!
//! Builds with the `dev-auth-bypass` feature may skip all of this when
//! [`ServerConfig::bypass_admin_auth`](crate::config::ServerConfig) is set.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use wedsite_core::entitlement::{grant_authorizes, MSG_ADMIN_PANEL_DENIED, MSG_USER_INACTIVE};
use wedsite_core::error::CoreError;
use wedsite_core::roles::ROLE_ADMIN;
use wedsite_core::types::{DbId, TemplateId};
use wedsite_db::repositories::{AdminPanelRepo, UserRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Path parameter naming the template a gated route operates on.
pub const TEMPLATE_PATH_PARAM: &str = "template_id";

/// How the caller was authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessVia {
    /// Active grant backed by a completed ultimate order.
    Grant { grant_id: DbId },
    PlatformAdmin,
    /// Synthetic ultimate grant injected by the development bypass.
    DevBypass,
}

/// Proof that the caller may administer `template_id`.
#[derive(Debug, Clone)]
pub struct AdminPanelAccess {
    pub template_id: TemplateId,
    /// `None` only under the development bypass.
    pub user_id: Option<DbId>,
    pub via: AccessVia,
}

impl FromRequestParts<AppState> for AdminPanelAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let template_id = template_id_from_path(parts, state).await?;

        if state.config.bypass_admin_auth {
            tracing::warn!(template_id = %template_id, "Admin-panel gate bypassed");
            return Ok(Self {
                template_id,
                user_id: None,
                via: AccessVia::DevBypass,
            });
        }

        // Token checks are purely cryptographic; no query runs until they pass.
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MSG_USER_INACTIVE.into())))?;

        if user.role == ROLE_ADMIN {
            return Ok(Self {
                template_id,
                user_id: Some(user.id),
                via: AccessVia::PlatformAdmin,
            });
        }

        let grants = AdminPanelRepo::find_grants(&state.pool, user.id, &template_id).await?;
        let grant = grants
            .iter()
            .find(|g| grant_authorizes(g.is_active, &g.order_status, &g.order_plan))
            .ok_or_else(|| {
                tracing::info!(user_id = user.id, template_id = %template_id, "Admin panel access denied");
                AppError::Core(CoreError::Forbidden(MSG_ADMIN_PANEL_DENIED.into()))
            })?;

        Ok(Self {
            template_id,
            user_id: Some(user.id),
            via: AccessVia::Grant { grant_id: grant.id },
        })
    }
}

async fn template_id_from_path(parts: &mut Parts, state: &AppState) -> Result<TemplateId, AppError> {
    let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;
    params
        .remove(TEMPLATE_PATH_PARAM)
        .ok_or_else(|| AppError::InternalError("Gated route is missing a template_id path parameter".into()))
}
