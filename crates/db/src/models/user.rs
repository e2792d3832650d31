//! Management user (customer / platform admin) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wedsite_core::types::{DbId, Timestamp};

/// Full row from the `management_users` table.
///
/// Contains the password hash and token hashes -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct ManagementUser {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub verification_token_hash: Option<String>,
    pub password_reset_token_hash: Option<String>,
    pub password_reset_expires_at: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub email_verified: bool,
    pub created_at: Timestamp,
}

impl From<&ManagementUser> for UserResponse {
    fn from(user: &ManagementUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub verification_token_hash: Option<String>,
}
