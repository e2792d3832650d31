//! Repository for the `rsvps` table.

use sqlx::PgPool;
use wedsite_core::rsvp::RsvpSubmission;
use wedsite_core::types::DbId;

use crate::models::rsvp::{Rsvp, RsvpStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template_id, first_name, last_name, email, guest_count, guest_names, \
                       attendance, message, submitted_at";

/// Provides operations for guest responses.
pub struct RsvpRepo;

impl RsvpRepo {
    /// Insert a response unless one already exists for `(template_id, email)`.
    ///
    /// Returns `None` on a duplicate. The check is the unique index itself, so
    /// concurrent submissions cannot both succeed.
    pub async fn insert_unique(
        pool: &PgPool,
        template_id: &str,
        input: &RsvpSubmission,
    ) -> Result<Option<Rsvp>, sqlx::Error> {
        let query = format!(
            "INSERT INTO rsvps
                (template_id, first_name, last_name, email, guest_count, guest_names, attendance, message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (template_id, lower(email)) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rsvp>(&query)
            .bind(template_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.guest_count)
            .bind(&input.guest_names)
            .bind(input.attendance.as_str())
            .bind(&input.message)
            .fetch_optional(pool)
            .await
    }

    /// List responses for a template, newest first.
    pub async fn list_by_template(pool: &PgPool, template_id: &str) -> Result<Vec<Rsvp>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rsvps WHERE template_id = $1 ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Rsvp>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Aggregate counts for a template.
    pub async fn stats(pool: &PgPool, template_id: &str) -> Result<RsvpStats, sqlx::Error> {
        sqlx::query_as::<_, RsvpStats>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE attendance = 'attending') AS attending,
                    COUNT(*) FILTER (WHERE attendance = 'not-attending') AS not_attending,
                    COALESCE(SUM(
                        CASE WHEN attendance = 'attending' AND guest_count ~ '^[0-9]{1,6}$'
                             THEN guest_count::BIGINT ELSE 0 END
                    ), 0)::BIGINT AS guest_total
             FROM rsvps WHERE template_id = $1",
        )
        .bind(template_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a response scoped to its template. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, template_id: &str, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rsvps WHERE id = $1 AND template_id = $2")
            .bind(id)
            .bind(template_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
