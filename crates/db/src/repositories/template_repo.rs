//! Repository for the `templates` table.

use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, TemplateSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, template_key, owner_email, config, maintenance, \
                       maintenance_password, source_template_id, is_main, created_at, updated_at";

/// Provides CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates
                (id, name, slug, template_key, owner_email, config, source_template_id, is_main)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.template_key)
            .bind(&input.owner_email)
            .bind(&input.config)
            .bind(&input.source_template_id)
            .bind(input.is_main)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its opaque id (case-sensitive).
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by its URL slug (case-sensitive).
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE slug = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a public identifier: try the id first, then the slug.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        if let Some(template) = Self::find_by_id(pool, identifier).await? {
            return Ok(Some(template));
        }
        Self::find_by_slug(pool, identifier).await
    }

    /// The platform's main template, if one is flagged.
    pub async fn find_main(pool: &PgPool) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE is_main LIMIT 1");
        sqlx::query_as::<_, Template>(&query)
            .fetch_optional(pool)
            .await
    }

    /// List every template with aggregated RSVP counts, main site first.
    pub async fn list_with_stats(pool: &PgPool) -> Result<Vec<TemplateSummary>, sqlx::Error> {
        sqlx::query_as::<_, TemplateSummary>(
            "SELECT t.id, t.name, t.slug, t.template_key, t.is_main, t.maintenance, t.created_at,
                    COUNT(r.id) AS rsvp_total,
                    COUNT(r.id) FILTER (WHERE r.attendance = 'attending') AS rsvp_attending,
                    COUNT(r.id) FILTER (WHERE r.attendance = 'not-attending') AS rsvp_not_attending,
                    COALESCE(SUM(
                        CASE WHEN r.attendance = 'attending' AND r.guest_count ~ '^[0-9]{1,6}$'
                             THEN r.guest_count::BIGINT ELSE 0 END
                    ), 0)::BIGINT AS guest_total
             FROM templates t
             LEFT JOIN rsvps r ON r.template_id = t.id
             GROUP BY t.id
             ORDER BY t.is_main DESC, t.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace the stored config. Returns `None` if no row with `id` exists.
    pub async fn update_config(
        pool: &PgPool,
        id: &str,
        config: &serde_json::Value,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET config = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(config)
            .fetch_optional(pool)
            .await
    }

    /// Toggle maintenance mode.
    ///
    /// `password_hash`: `None` keeps the current password, `Some(None)` clears
    /// it, `Some(Some(hash))` replaces it.
    pub async fn set_maintenance(
        pool: &PgPool,
        id: &str,
        enabled: bool,
        password_hash: Option<Option<&str>>,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET
                maintenance = $2,
                maintenance_password = CASE WHEN $3 THEN $4 ELSE maintenance_password END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(enabled)
            .bind(password_hash.is_some())
            .bind(password_hash.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template. RSVPs, images, grants and translations cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
