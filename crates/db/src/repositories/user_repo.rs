//! Repository for the `management_users` table.

use sqlx::PgPool;
use wedsite_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, ManagementUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, is_active, \
                       email_verified, verification_token_hash, password_reset_token_hash, \
                       password_reset_expires_at, last_login_at, created_at, updated_at";

/// Provides CRUD operations for management users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<ManagementUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO management_users
                (email, password_hash, first_name, last_name, role, verification_token_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(&input.verification_token_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ManagementUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM management_users WHERE id = $1");
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<ManagementUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM management_users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Mark the user holding this verification token as verified and consume the token.
    pub async fn verify_email(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<ManagementUser>, sqlx::Error> {
        let query = format!(
            "UPDATE management_users SET email_verified = true, verification_token_hash = NULL
             WHERE verification_token_hash = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Store a password-reset token hash with its expiry.
    pub async fn set_password_reset(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE management_users SET
                password_reset_token_hash = $2,
                password_reset_expires_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password of the user holding an unexpired reset token and
    /// consume the token. Returns `None` if the token is unknown or expired.
    pub async fn reset_password(
        pool: &PgPool,
        token_hash: &str,
        password_hash: &str,
    ) -> Result<Option<ManagementUser>, sqlx::Error> {
        let query = format!(
            "UPDATE management_users SET
                password_hash = $2,
                password_reset_token_hash = NULL,
                password_reset_expires_at = NULL
             WHERE password_reset_token_hash = $1 AND password_reset_expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(token_hash)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_login_at` to now.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE management_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Create or refresh the bootstrap platform admin. The account is verified,
    /// active and carries the admin role afterwards.
    pub async fn upsert_admin(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<ManagementUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO management_users (email, password_hash, role, email_verified)
             VALUES ($1, $2, 'admin', true)
             ON CONFLICT (lower(email)) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                role = 'admin',
                is_active = true,
                email_verified = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManagementUser>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }
}
