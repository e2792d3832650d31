//! Handlers for per-template UI translations.
//!
//! Stored rows are flat `key -> value` pairs; reads rebuild the nested shape
//! and merge it over the defaults, writes flatten the submitted document.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use wedsite_core::config_merge::{flatten, merge_with_defaults, unflatten};
use wedsite_core::error::CoreError;
use wedsite_core::translations::{
    default_translations, validate_locale, validate_translation_entries,
};
use wedsite_db::models::activity_log::ACTION_TRANSLATIONS_UPDATED;
use wedsite_db::repositories::TranslationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::activity;
use crate::handlers::templates::{load_by_id, load_by_identifier};
use crate::middleware::entitlement::AdminPanelAccess;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TranslationsSaved {
    pub locale: String,
    pub keys: u64,
}

/// GET /api/templates/{template_id}/translations/{locale}
///
/// Always returns the complete shape; keys with no stored value fall back to
/// the defaults, stored empty strings are kept.
pub async fn get_translations(
    State(state): State<AppState>,
    Path((identifier, locale)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    validate_locale(&locale)?;
    let template = load_by_identifier(&state, &identifier).await?;

    let rows = TranslationRepo::list(&state.pool, &template.id, &locale).await?;
    let stored = unflatten(rows.iter().map(|r| (r.key.as_str(), r.value.as_str())));

    Ok(Json(merge_with_defaults(&default_translations(), &stored)))
}

/// PUT /api/templates/{template_id}/translations/{locale}
///
/// Replaces every stored key for the locale in one transaction.
pub async fn put_translations(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Path((_, locale)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> AppResult<Json<DataResponse<TranslationsSaved>>> {
    validate_locale(&locale)?;
    if !payload.is_object() {
        return Err(AppError::Core(CoreError::Validation(
            "translations must be a JSON object".into(),
        )));
    }
    let template = load_by_id(&state, &access.template_id).await?;

    let entries = flatten(&payload);
    validate_translation_entries(&entries)?;
    let keys = TranslationRepo::replace(&state.pool, &template.id, &locale, &entries).await?;

    tracing::info!(template_id = %template.id, locale = %locale, keys, "Translations replaced");
    activity::record(
        &state,
        access.user_id,
        Some(&template.id),
        ACTION_TRANSLATIONS_UPDATED,
        json!({ "locale": locale, "keys": keys }),
    )
    .await;

    Ok(Json(DataResponse {
        data: TranslationsSaved { locale, keys },
    }))
}
