//! Template entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wedsite_core::types::{TemplateId, Timestamp};

/// Full row from the `templates` table.
///
/// `maintenance_password` holds an argon2 hash and is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub slug: String,
    pub template_key: String,
    pub owner_email: Option<String>,
    pub config: serde_json::Value,
    pub maintenance: bool,
    #[serde(skip_serializing)]
    pub maintenance_password: Option<String>,
    pub source_template_id: Option<TemplateId>,
    pub is_main: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Template listing row with aggregated RSVP counts.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
    pub slug: String,
    pub template_key: String,
    pub is_main: bool,
    pub maintenance: bool,
    pub created_at: Timestamp,
    pub rsvp_total: i64,
    pub rsvp_attending: i64,
    pub rsvp_not_attending: i64,
    /// Sum of numeric guest counts across attending responses.
    pub guest_total: i64,
}

/// DTO for inserting a template. The id is generated by the caller.
#[derive(Debug, Clone)]
pub struct CreateTemplate {
    pub id: TemplateId,
    pub name: String,
    pub slug: String,
    pub template_key: String,
    pub owner_email: Option<String>,
    pub config: serde_json::Value,
    pub source_template_id: Option<TemplateId>,
    pub is_main: bool,
}

/// Request body for `POST /api/templates`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub slug: Option<String>,
    pub template_key: Option<String>,
    pub owner_email: Option<String>,
    pub source_template_id: Option<TemplateId>,
    #[serde(default)]
    pub is_main: bool,
}

/// Request body for `PUT /api/templates/{id}/maintenance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenance {
    pub enabled: bool,
    /// New unlock password. Omit to keep the current one; send `""` to clear it.
    pub password: Option<String>,
}
