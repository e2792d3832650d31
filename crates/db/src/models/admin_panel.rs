//! Admin-panel grant model.

use serde::Serialize;
use sqlx::FromRow;
use wedsite_core::types::{DbId, TemplateId, Timestamp};

/// A row from the `user_admin_panels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAdminPanel {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: TemplateId,
    pub template_slug: String,
    pub order_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A grant joined with the order that backs it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPanelGrant {
    pub id: DbId,
    pub template_id: TemplateId,
    pub template_slug: String,
    pub template_name: String,
    pub is_active: bool,
    pub order_id: DbId,
    pub order_status: String,
    pub order_plan: String,
}
