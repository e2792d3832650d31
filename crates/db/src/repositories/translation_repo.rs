//! Repository for the `template_translations` table.

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::models::translation::TranslationEntry;

/// Provides flat key-value storage for per-template translation overrides.
pub struct TranslationRepo;

impl TranslationRepo {
    /// All stored entries for a template and locale, ordered by key.
    pub async fn list(
        pool: &PgPool,
        template_id: &str,
        locale: &str,
    ) -> Result<Vec<TranslationEntry>, sqlx::Error> {
        sqlx::query_as::<_, TranslationEntry>(
            "SELECT key, value FROM template_translations
             WHERE template_id = $1 AND locale = $2
             ORDER BY key",
        )
        .bind(template_id)
        .bind(locale)
        .fetch_all(pool)
        .await
    }

    /// Replace every entry for a template and locale in one transaction.
    /// Returns the number of entries written.
    pub async fn replace(
        pool: &PgPool,
        template_id: &str,
        locale: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<u64, sqlx::Error> {
        let (keys, values): (Vec<&str>, Vec<&str>) = entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .unzip();

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM template_translations WHERE template_id = $1 AND locale = $2")
            .bind(template_id)
            .bind(locale)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(
            "INSERT INTO template_translations (template_id, locale, key, value)
             SELECT $1, $2, k, v FROM UNNEST($3::TEXT[], $4::TEXT[]) AS t(k, v)",
        )
        .bind(template_id)
        .bind(locale)
        .bind(&keys)
        .bind(&values)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
