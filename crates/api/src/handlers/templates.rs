//! Handlers for the `/templates` resource: listing, administration, config
//! resolution and maintenance mode.

use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wedsite_core::error::CoreError;
use wedsite_core::registry::FALLBACK_TEMPLATE_KEY;
use wedsite_core::resolver::{
    partition_images, resolve, resolve_unlocked, PartitionedImages, TemplateSource,
    CONFIG_CACHE_MAX_AGE_SECS,
};
use wedsite_core::slug::{slugify, validate_slug};
use wedsite_core::template_config::validate_config;
use wedsite_core::types::new_template_id;
use wedsite_db::models::activity_log::{
    ACTION_CONFIG_UPDATED, ACTION_MAINTENANCE_UPDATED, ACTION_TEMPLATE_CREATED,
    ACTION_TEMPLATE_DELETED,
};
use wedsite_db::models::template::{
    CreateTemplate, CreateTemplateRequest, Template, TemplateSummary, UpdateMaintenance,
};
use wedsite_db::repositories::{TemplateImageRepo, TemplateRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::activity;
use crate::middleware::entitlement::AdminPanelAccess;
use crate::middleware::rate_limit::AuthRateLimit;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted template display name.
const MAX_NAME_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for `GET /api/templates`. `warning` is set when the listing
/// degraded to an empty result.
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub data: Vec<TemplateSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// Request body for `POST /api/templates/{template_id}/unlock`.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Look a template up by id, then by slug.
pub(crate) async fn load_by_identifier(state: &AppState, identifier: &str) -> AppResult<Template> {
    TemplateRepo::find_by_identifier(&state.pool, identifier)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Template", identifier)))
}

/// Look a template up by its primary id only.
pub(crate) async fn load_by_id(state: &AppState, id: &str) -> AppResult<Template> {
    TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Template", id)))
}

async fn load_images(state: &AppState, template_id: &str) -> AppResult<PartitionedImages> {
    let rows = TemplateImageRepo::list_by_template(&state.pool, template_id, None).await?;
    Ok(partition_images(
        rows.iter().map(|i| (i.category.as_str(), i.url.as_str())),
    ))
}

fn source(template: &Template) -> TemplateSource<'_> {
    TemplateSource {
        id: &template.id,
        template_key: &template.template_key,
        config: &template.config,
        maintenance: template.maintenance,
    }
}

// ---------------------------------------------------------------------------
// Listing and administration
// ---------------------------------------------------------------------------

/// GET /api/templates
///
/// Lists templates with RSVP counts. The query races a fixed deadline; on
/// timeout or database error an empty list is returned with a warning.
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let query = TemplateRepo::list_with_stats(&state.pool);
    let warning = match tokio::time::timeout(state.config.read_guard_timeout, query).await {
        Ok(Ok(data)) => return Json(TemplateListResponse { data, warning: None }),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Template listing failed; returning empty list");
            "Templates are temporarily unavailable"
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.config.read_guard_timeout.as_millis() as u64,
                "Template listing timed out; returning empty list"
            );
            "Templates are temporarily unavailable (timeout)"
        }
    };
    Json(TemplateListResponse {
        data: Vec::new(),
        warning: Some(warning),
    })
}

/// POST /api/templates
///
/// Create a template. With `sourceTemplateId` the stored config of that
/// template is copied; otherwise the template starts from its theme defaults.
pub async fn create_template(
    State(state): State<AppState>,
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    Json(input): Json<CreateTemplateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    let name = input.name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "name must be between 1 and {MAX_NAME_LENGTH} characters"
        ))));
    }

    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(&name),
    };
    validate_slug(&slug)?;

    let template_key = input
        .template_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(FALLBACK_TEMPLATE_KEY)
        .to_string();
    state.registry.ensure_registered(&template_key)?;

    let config = match input.source_template_id.as_deref() {
        Some(source_id) => load_by_id(&state, source_id).await?.config,
        None => json!({}),
    };

    let template = TemplateRepo::create(
        &state.pool,
        &CreateTemplate {
            id: new_template_id(),
            name,
            slug,
            template_key,
            owner_email: input
                .owner_email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
            config,
            source_template_id: input.source_template_id,
            is_main: input.is_main,
        },
    )
    .await?;

    tracing::info!(template_id = %template.id, slug = %template.slug, "Template created");
    activity::record(
        &state,
        Some(admin.user_id),
        Some(&template.id),
        ACTION_TEMPLATE_CREATED,
        json!({ "slug": template.slug, "templateKey": template.template_key }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// DELETE /api/templates/{template_id}
///
/// Deletes the template and everything scoped to it. Stored image objects
/// are removed best-effort afterwards.
pub async fn delete_template(
    State(state): State<AppState>,
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    Path(template_id): Path<String>,
) -> AppResult<StatusCode> {
    let template = load_by_id(&state, &template_id).await?;
    let images = TemplateImageRepo::list_by_template(&state.pool, &template.id, None).await?;

    if !TemplateRepo::delete(&state.pool, &template.id).await? {
        return Err(AppError::Core(CoreError::not_found("Template", &template.id)));
    }

    for image in &images {
        if let Err(e) = state.storage.delete(&image.object_key).await {
            tracing::warn!(error = %e, key = %image.object_key, "Orphaned image object after template delete");
        }
    }

    tracing::info!(template_id = %template.id, images = images.len(), "Template deleted");
    // The template's own log rows cascade with it.
    activity::record(
        &state,
        Some(admin.user_id),
        None,
        ACTION_TEMPLATE_DELETED,
        json!({ "templateId": template.id, "slug": template.slug }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// GET /api/templates/{template_id}/config
///
/// Resolves a template by id or slug. Live sites get the merged, image-enriched
/// config; sites in maintenance get only the maintenance payload.
pub async fn get_config(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> AppResult<Response> {
    let template = load_by_identifier(&state, &identifier).await?;

    let images = if template.maintenance {
        PartitionedImages::default()
    } else {
        load_images(&state, &template.id).await?
    };

    let resolved = resolve(source(&template), &state.registry, &images);
    let cache_control = if resolved.is_maintenance() {
        "no-store".to_string()
    } else {
        format!("public, max-age={CONFIG_CACHE_MAX_AGE_SECS}")
    };
    let response = ([(CACHE_CONTROL, cache_control)], Json(resolved)).into_response();
    Ok(response)
}

/// PUT /api/templates/{template_id}/config
///
/// Replaces the stored config document after schema validation.
pub async fn update_config(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Json(config): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<Template>>> {
    validate_config(&config)?;

    let template = TemplateRepo::update_config(&state.pool, &access.template_id, &config)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Template", &access.template_id)))?;

    tracing::info!(template_id = %template.id, "Template config updated");
    activity::record(
        &state,
        access.user_id,
        Some(&template.id),
        ACTION_CONFIG_UPDATED,
        json!({}),
    )
    .await;

    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

/// PUT /api/templates/{template_id}/maintenance
///
/// Toggles maintenance mode. `password` omitted keeps the current unlock
/// password, an empty string clears it.
pub async fn set_maintenance(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Json(input): Json<UpdateMaintenance>,
) -> AppResult<Json<DataResponse<Template>>> {
    let hashed = match input.password.as_deref() {
        None => None,
        Some(p) if p.trim().is_empty() => Some(None),
        Some(p) => Some(Some(hash_password(p).map_err(|e| {
            AppError::InternalError(format!("Password hashing error: {e}"))
        })?)),
    };

    let template = TemplateRepo::set_maintenance(
        &state.pool,
        &access.template_id,
        input.enabled,
        hashed.as_ref().map(|h| h.as_deref()),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::not_found("Template", &access.template_id)))?;

    tracing::info!(template_id = %template.id, enabled = input.enabled, "Maintenance mode updated");
    activity::record(
        &state,
        access.user_id,
        Some(&template.id),
        ACTION_MAINTENANCE_UPDATED,
        json!({ "enabled": input.enabled, "passwordChanged": hashed.is_some() }),
    )
    .await;

    Ok(Json(DataResponse { data: template }))
}

/// POST /api/templates/{template_id}/unlock
///
/// Returns the full config of a site in maintenance when the password
/// matches. Live sites are returned as-is.
pub async fn unlock(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    Path(identifier): Path<String>,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Response> {
    let template = load_by_identifier(&state, &identifier).await?;

    if template.maintenance {
        let matches = match template.maintenance_password.as_deref() {
            Some(hash) => verify_password(&input.password, hash).map_err(|e| {
                AppError::InternalError(format!("Password verification error: {e}"))
            })?,
            None => false,
        };
        if !matches {
            tracing::info!(template_id = %template.id, "Maintenance unlock rejected");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid maintenance password".into(),
            )));
        }
    }

    let images = load_images(&state, &template.id).await?;
    let config = resolve_unlocked(source(&template), &state.registry, &images);
    Ok(([(CACHE_CONTROL, "no-store")], Json(config)).into_response())
}
