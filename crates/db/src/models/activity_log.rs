//! Audit trail of admin actions.

use serde::Serialize;
use sqlx::FromRow;
use wedsite_core::types::{DbId, TemplateId, Timestamp};

pub const ACTION_TEMPLATE_CREATED: &str = "template.created";
pub const ACTION_TEMPLATE_DELETED: &str = "template.deleted";
pub const ACTION_CONFIG_UPDATED: &str = "config.updated";
pub const ACTION_MAINTENANCE_UPDATED: &str = "maintenance.updated";
pub const ACTION_IMAGE_UPLOADED: &str = "image.uploaded";
pub const ACTION_IMAGE_DELETED: &str = "image.deleted";
pub const ACTION_IMAGES_REORDERED: &str = "image.reordered";
pub const ACTION_RSVP_DELETED: &str = "rsvp.deleted";
pub const ACTION_TRANSLATIONS_UPDATED: &str = "translations.updated";
pub const ACTION_ORDER_COMPLETED: &str = "order.completed";

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub template_id: Option<TemplateId>,
    pub action: String,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for recording an activity entry.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: Option<DbId>,
    pub template_id: Option<TemplateId>,
    pub action: &'static str,
    pub details: serde_json::Value,
}
