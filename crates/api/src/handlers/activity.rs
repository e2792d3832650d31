//! Handlers for the template activity log.

use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;
use wedsite_core::types::DbId;
use wedsite_db::models::activity_log::{ActivityLog, CreateActivityLog};
use wedsite_db::repositories::ActivityLogRepo;

use crate::error::AppResult;
use crate::middleware::entitlement::AdminPanelAccess;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Append an audit entry. Failures are logged and never fail the request
/// that triggered them.
pub async fn record(
    state: &AppState,
    user_id: Option<DbId>,
    template_id: Option<&str>,
    action: &'static str,
    details: Value,
) {
    let input = CreateActivityLog {
        user_id,
        template_id: template_id.map(str::to_string),
        action,
        details,
    };
    if let Err(e) = ActivityLogRepo::record(&state.pool, &input).await {
        tracing::warn!(error = %e, action, "Failed to record activity");
    }
}

/// GET /api/templates/{template_id}/activity
pub async fn list_activity(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityLog>>>> {
    let entries = ActivityLogRepo::list_for_template(
        &state.pool,
        &access.template_id,
        wedsite_db::clamp_limit(params.limit),
        wedsite_db::clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}
