//! Repository for the `user_admin_panels` table.

use sqlx::PgPool;
use wedsite_core::types::DbId;

use crate::models::admin_panel::{AdminPanelGrant, UserAdminPanel};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, template_id, template_slug, order_id, is_active, created_at, updated_at";

/// Grant columns joined with the backing order and template.
const GRANT_SELECT: &str = "SELECT g.id, g.template_id, g.template_slug, t.name AS template_name,
                                   g.is_active, g.order_id,
                                   o.status AS order_status, o.template_plan AS order_plan
                            FROM user_admin_panels g
                            JOIN orders o ON o.id = g.order_id
                            JOIN templates t ON t.id = g.template_id";

/// Provides operations for admin-panel grants.
pub struct AdminPanelRepo;

impl AdminPanelRepo {
    /// Create a grant for a completed order. A slug already granted is
    /// re-pointed at the new order and user.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        template_id: &str,
        template_slug: &str,
        order_id: DbId,
    ) -> Result<UserAdminPanel, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_admin_panels (user_id, template_id, template_slug, order_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_user_admin_panels_template_slug DO UPDATE SET
                user_id = EXCLUDED.user_id,
                template_id = EXCLUDED.template_id,
                order_id = EXCLUDED.order_id,
                is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAdminPanel>(&query)
            .bind(user_id)
            .bind(template_id)
            .bind(template_slug)
            .bind(order_id)
            .fetch_one(pool)
            .await
    }

    /// All grants a user holds for one template, with their order state.
    pub async fn find_grants(
        pool: &PgPool,
        user_id: DbId,
        template_id: &str,
    ) -> Result<Vec<AdminPanelGrant>, sqlx::Error> {
        let query = format!("{GRANT_SELECT} WHERE g.user_id = $1 AND g.template_id = $2");
        sqlx::query_as::<_, AdminPanelGrant>(&query)
            .bind(user_id)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Every grant a user holds, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AdminPanelGrant>, sqlx::Error> {
        let query = format!("{GRANT_SELECT} WHERE g.user_id = $1 ORDER BY g.created_at DESC");
        sqlx::query_as::<_, AdminPanelGrant>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate the grant backed by an order. Returns `true` if a row changed.
    pub async fn deactivate_for_order(pool: &PgPool, order_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_admin_panels SET is_active = false WHERE order_id = $1 AND is_active",
        )
        .bind(order_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
