//! Handlers for template images: public listing, upload, delete and ordering.

use std::collections::HashSet;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wedsite_core::error::CoreError;
use wedsite_core::resolver::{validate_category, CATEGORY_GALLERY};
use wedsite_core::types::DbId;
use wedsite_core::upload::{object_key, validate_image_upload};
use wedsite_db::models::activity_log::{
    ACTION_IMAGES_REORDERED, ACTION_IMAGE_DELETED, ACTION_IMAGE_UPLOADED,
};
use wedsite_db::models::image::{CreateTemplateImage, ReorderImages, TemplateImage, UploadedImage};
use wedsite_db::repositories::TemplateImageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::activity;
use crate::handlers::templates::{load_by_id, load_by_identifier};
use crate::middleware::entitlement::AdminPanelAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field names accepted for the file part.
const FILE_FIELDS: &[&str] = &["file", "photo", "image"];

/// Longest stored original file name.
const MAX_FILE_NAME_LENGTH: usize = 255;

#[derive(Debug, Deserialize)]
pub struct ImageListParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub updated: u64,
}

/// Strip any client-side directory components and clamp the length.
fn display_name(file_name: Option<&str>, extension: &str) -> String {
    let base = file_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|n| !n.is_empty());
    match base {
        Some(name) => name.chars().take(MAX_FILE_NAME_LENGTH).collect(),
        None => format!("image.{extension}"),
    }
}

/// GET /api/templates/{template_id}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(params): Query<ImageListParams>,
) -> AppResult<Json<DataResponse<Vec<TemplateImage>>>> {
    if let Some(category) = params.category.as_deref() {
        validate_category(category)?;
    }
    let template = load_by_identifier(&state, &identifier).await?;
    let images =
        TemplateImageRepo::list_by_template(&state.pool, &template.id, params.category.as_deref())
            .await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/templates/{template_id}/photos/upload
///
/// Multipart form with a `file` part and an optional `category` text part
/// (`hero`, `gallery` or `other`; default `gallery`). The object is written
/// before its row; if the row insert fails the object is removed again.
pub async fn upload_image(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedImage>)> {
    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if FILE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, content_type, data.to_vec()));
        } else if name == "category" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            category = Some(text.trim().to_lowercase());
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let category = category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| CATEGORY_GALLERY.to_string());
    validate_category(&category)?;

    let validated = validate_image_upload(content_type.as_deref(), &data)?;
    let template = load_by_id(&state, &access.template_id).await?;

    let key = object_key(&template.id, validated.extension);
    let url = state.storage.put(&key, data, validated.mime_type).await?;

    let input = CreateTemplateImage {
        template_id: template.id.clone(),
        url,
        object_key: key.clone(),
        name: display_name(file_name.as_deref(), validated.extension),
        category,
        size: Some(validated.size as i64),
        mime_type: Some(validated.mime_type.to_string()),
    };
    let image = match TemplateImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&key).await {
                tracing::warn!(error = %cleanup, key = %key, "Failed to remove object after insert error");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        template_id = %template.id,
        image_id = image.id,
        category = %image.category,
        size = validated.size,
        "Image uploaded"
    );
    activity::record(
        &state,
        access.user_id,
        Some(&template.id),
        ACTION_IMAGE_UPLOADED,
        json!({ "imageId": image.id, "category": image.category }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(UploadedImage::from(image))))
}

/// DELETE /api/templates/{template_id}/images/{image_id}
///
/// The row goes first. A failed object delete only leaves an orphaned file.
pub async fn delete_image(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Path((_, image_id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let image = TemplateImageRepo::delete(&state.pool, &access.template_id, image_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("TemplateImage", image_id)))?;

    if let Err(e) = state.storage.delete(&image.object_key).await {
        tracing::warn!(error = %e, key = %image.object_key, "Orphaned image object");
    }

    activity::record(
        &state,
        access.user_id,
        Some(&access.template_id),
        ACTION_IMAGE_DELETED,
        json!({ "imageId": image.id, "category": image.category }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/templates/{template_id}/images/order
pub async fn reorder_images(
    State(state): State<AppState>,
    access: AdminPanelAccess,
    Json(input): Json<ReorderImages>,
) -> AppResult<Json<DataResponse<ReorderResult>>> {
    let mut seen = HashSet::with_capacity(input.image_ids.len());
    if let Some(dup) = input.image_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "imageIds contains {dup} more than once"
        ))));
    }

    let updated =
        TemplateImageRepo::reorder(&state.pool, &access.template_id, &input.image_ids).await?;

    activity::record(
        &state,
        access.user_id,
        Some(&access.template_id),
        ACTION_IMAGES_REORDERED,
        json!({ "count": updated }),
    )
    .await;

    Ok(Json(DataResponse {
        data: ReorderResult { updated },
    }))
}
