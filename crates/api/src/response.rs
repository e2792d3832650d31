//! Shared response envelope types for API handlers.
//!
//! Admin-facing responses use a `{ "data": ... }` envelope. Public site
//! endpoints (config, RSVP, maintenance status) return their own documented
//! shapes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ... }` body for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
