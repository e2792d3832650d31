//! Uploaded template image model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wedsite_core::types::{DbId, TemplateId, Timestamp};

/// A row from the `template_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateImage {
    pub id: DbId,
    pub template_id: TemplateId,
    pub url: String,
    /// Storage key of the object backing `url`.
    #[serde(skip_serializing)]
    pub object_key: String,
    pub name: String,
    pub category: String,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
    /// String sort key; compared lexicographically.
    pub sort_order: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an image row after its bytes are stored.
#[derive(Debug, Clone)]
pub struct CreateTemplateImage {
    pub template_id: TemplateId,
    pub url: String,
    pub object_key: String,
    pub name: String,
    pub category: String,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
}

/// Request body for `PUT /api/templates/{id}/images/order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImages {
    pub image_ids: Vec<DbId>,
}

/// Response body for a completed upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: DbId,
    pub url: String,
    pub name: String,
    pub size: Option<i64>,
    pub category: String,
    pub template_id: TemplateId,
}

impl From<TemplateImage> for UploadedImage {
    fn from(image: TemplateImage) -> Self {
        Self {
            id: image.id,
            url: image.url,
            name: image.name,
            size: image.size,
            category: image.category,
            template_id: image.template_id,
        }
    }
}
