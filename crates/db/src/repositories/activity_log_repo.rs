//! Repository for the `activity_logs` table.

use sqlx::PgPool;

use crate::models::activity_log::{ActivityLog, CreateActivityLog};

const COLUMNS: &str = "id, user_id, template_id, action, details, created_at";

/// Append-only audit log.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    pub async fn record(pool: &PgPool, input: &CreateActivityLog) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (user_id, template_id, action, details)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(input.user_id)
            .bind(&input.template_id)
            .bind(input.action)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// Most recent entries for a template.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs WHERE template_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(template_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
