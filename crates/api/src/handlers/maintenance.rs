//! Public maintenance-status endpoint used by site frontends.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use wedsite_db::models::template::Template;
use wedsite_db::repositories::TemplateRepo;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MaintenanceQuery {
    /// Template id or slug. Defaults to the main template.
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MaintenanceStatus {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// GET /api/maintenance
///
/// Never fails: a database error or a lookup slower than the read guard
/// reports the site as live with a warning.
pub async fn maintenance_status(
    State(state): State<AppState>,
    Query(query): Query<MaintenanceQuery>,
) -> Json<MaintenanceStatus> {
    let lookup = async {
        match query.template.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(identifier) => TemplateRepo::find_by_identifier(&state.pool, identifier).await,
            None => TemplateRepo::find_main(&state.pool).await,
        }
    };

    let warning = match tokio::time::timeout(state.config.read_guard_timeout, lookup).await {
        Ok(Ok(template)) => {
            return Json(MaintenanceStatus {
                enabled: template.as_ref().is_some_and(|t: &Template| t.maintenance),
                warning: None,
            })
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Maintenance lookup failed; reporting disabled");
            "Maintenance status unavailable; defaulting to disabled"
        }
        Err(_) => {
            tracing::warn!("Maintenance lookup timed out; reporting disabled");
            "Maintenance status timed out; defaulting to disabled"
        }
    };

    Json(MaintenanceStatus {
        enabled: false,
        warning: Some(warning),
    })
}
