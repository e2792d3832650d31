//! Handlers for RSVP intake and administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use wedsite_core::email_template::rsvp_emails;
use wedsite_core::error::CoreError;
use wedsite_core::rsvp::RsvpPayload;
use wedsite_core::types::DbId;
use wedsite_db::models::activity_log::ACTION_RSVP_DELETED;
use wedsite_db::models::rsvp::{Rsvp, RsvpReceipt, RsvpStats};
use wedsite_db::repositories::RsvpRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::activity;
use crate::handlers::templates::load_by_identifier;
use crate::middleware::entitlement::AdminPanelAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a successful RSVP. Only the receipt fields are echoed back.
#[derive(Debug, Serialize)]
pub struct RsvpSubmitted {
    pub message: &'static str,
    pub rsvp: RsvpReceipt,
}

/// RSVP rows plus aggregate counts for the admin panel.
#[derive(Debug, Serialize)]
pub struct RsvpListing {
    pub rsvps: Vec<Rsvp>,
    pub stats: RsvpStats,
}

/// POST /api/templates/{template_id}/rsvp
///
/// Records one response per email per template. Notification and
/// confirmation emails go out in the background after the row is stored.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Json(payload): Json<RsvpPayload>,
) -> AppResult<Json<RsvpSubmitted>> {
    let template = load_by_identifier(&state, &identifier).await?;

    if template.maintenance {
        return Err(AppError::Core(CoreError::Maintenance(
            "This site is currently in maintenance mode".into(),
        )));
    }

    let submission = payload.into_submission()?;

    // The unique index on (template_id, lower(email)) decides duplicates,
    // so concurrent submissions cannot both succeed.
    let rsvp = RsvpRepo::insert_unique(&state.pool, &template.id, &submission)
        .await?
        .ok_or_else(|| {
            tracing::info!(template_id = %template.id, "Duplicate RSVP rejected");
            AppError::Core(CoreError::Duplicate(
                "An RSVP has already been submitted for this email".into(),
            ))
        })?;

    tracing::info!(
        template_id = %template.id,
        rsvp_id = rsvp.id,
        attendance = %rsvp.attendance,
        "RSVP recorded"
    );

    let config = state
        .registry
        .resolve_config(&template.template_key, &template.config);
    let emails = rsvp_emails(
        &config,
        &template.name,
        template.owner_email.as_deref(),
        &submission,
    );
    if let Some(notification) = emails.notification {
        state.send_email_in_background(notification);
    }
    state.send_email_in_background(emails.confirmation);

    Ok(Json(RsvpSubmitted {
        message: "RSVP submitted successfully",
        rsvp: RsvpReceipt::from(&rsvp),
    }))
}

/// GET /api/templates/{template_id}/rsvps
pub async fn list_rsvps(
    State(state): State<AppState>,
    access: AdminPanelAccess,
) -> AppResult<Json<DataResponse<RsvpListing>>> {
    let rsvps = RsvpRepo::list_by_template(&state.pool, &access.template_id).await?;
    let stats = RsvpRepo::stats(&state.pool, &access.template_id).await?;
    Ok(Json(DataResponse {
        data: RsvpListing { rsvps, stats },
    }))
}

/// DELETE /api/templates/{template_id}/rsvps/{rsvp_id}
///
/// Removing a response frees its email for a fresh submission.
pub async fn delete_rsvp(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Path((_, rsvp_id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    if !RsvpRepo::delete(&state.pool, &access.template_id, rsvp_id).await? {
        return Err(AppError::Core(CoreError::not_found("Rsvp", rsvp_id)));
    }

    activity::record(
        &state,
        access.user_id,
        Some(&access.template_id),
        ACTION_RSVP_DELETED,
        json!({ "rsvpId": rsvp_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
