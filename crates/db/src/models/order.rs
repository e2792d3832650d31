//! Purchase order model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wedsite_core::types::{DbId, TemplateId, Timestamp};

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: TemplateId,
    pub template_plan: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body / DTO for recording an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub user_id: DbId,
    pub template_id: TemplateId,
    pub template_plan: String,
    #[serde(default)]
    pub amount_cents: i64,
    pub currency: Option<String>,
}
