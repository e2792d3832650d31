//! Repository for the `template_images` table.

use sqlx::PgPool;
use wedsite_core::types::DbId;

use crate::models::image::{CreateTemplateImage, TemplateImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template_id, url, object_key, name, category, size, mime_type, \
                       sort_order, created_at, updated_at";

/// Width of the zero-padded numeric sort keys.
const SORT_KEY_WIDTH: usize = 6;

/// Format a position as a lexicographically sortable key.
pub fn sort_key(position: usize) -> String {
    format!("{position:0width$}", width = SORT_KEY_WIDTH)
}

/// Provides CRUD operations for uploaded template images.
pub struct TemplateImageRepo;

impl TemplateImageRepo {
    /// Insert an image row, appending it to the end of its category.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTemplateImage,
    ) -> Result<TemplateImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_images
                (template_id, url, object_key, name, category, size, mime_type, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     LPAD((SELECT COUNT(*) + 1 FROM template_images
                           WHERE template_id = $1 AND category = $5)::TEXT, {SORT_KEY_WIDTH}, '0'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateImage>(&query)
            .bind(&input.template_id)
            .bind(&input.url)
            .bind(&input.object_key)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.size)
            .bind(&input.mime_type)
            .fetch_one(pool)
            .await
    }

    /// List images for a template, optionally filtered by category, in display order.
    pub async fn list_by_template(
        pool: &PgPool,
        template_id: &str,
        category: Option<&str>,
    ) -> Result<Vec<TemplateImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_images
             WHERE template_id = $1 AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateImage>(&query)
            .bind(template_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Delete an image row scoped to its template, returning the deleted row.
    pub async fn delete(
        pool: &PgPool,
        template_id: &str,
        id: DbId,
    ) -> Result<Option<TemplateImage>, sqlx::Error> {
        let query = format!(
            "DELETE FROM template_images WHERE id = $1 AND template_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateImage>(&query)
            .bind(id)
            .bind(template_id)
            .fetch_optional(pool)
            .await
    }

    /// Rewrite sort keys so `ids` appear in the given order. Ids that do not
    /// belong to the template are ignored. Returns the number of rows updated.
    pub async fn reorder(pool: &PgPool, template_id: &str, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for (index, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE template_images SET sort_order = $3 WHERE id = $1 AND template_id = $2",
            )
            .bind(id)
            .bind(template_id)
            .bind(sort_key(index + 1))
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}
