//! RSVP entity model and projections.

use serde::Serialize;
use sqlx::FromRow;
use wedsite_core::types::{DbId, TemplateId, Timestamp};

/// A row from the `rsvps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: DbId,
    pub template_id: TemplateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub guest_count: String,
    pub guest_names: Option<String>,
    pub attendance: String,
    pub message: Option<String>,
    pub submitted_at: Timestamp,
}

/// The minimal record echoed back to a guest after submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpReceipt {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub attendance: String,
}

impl From<&Rsvp> for RsvpReceipt {
    fn from(rsvp: &Rsvp) -> Self {
        Self {
            id: rsvp.id,
            first_name: rsvp.first_name.clone(),
            last_name: rsvp.last_name.clone(),
            attendance: rsvp.attendance.clone(),
        }
    }
}

/// Aggregated response counts for one template.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpStats {
    pub total: i64,
    pub attending: i64,
    pub not_attending: i64,
    pub guest_total: i64,
}
