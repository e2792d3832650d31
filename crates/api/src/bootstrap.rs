//! Startup tasks that run once before the server accepts connections.

use wedsite_db::repositories::UserRepo;
use wedsite_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create or refresh the platform admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
///
/// Re-running with the same email resets the password and re-activates the account.
pub async fn ensure_platform_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<()> {
    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::BadRequest(format!("ADMIN_PASSWORD rejected: {e}")))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let email = admin.email.trim().to_lowercase();
    let user = UserRepo::upsert_admin(pool, &email, &password_hash).await?;
    tracing::info!(user_id = user.id, email = %user.email, "Platform admin account ensured");
    Ok(())
}
