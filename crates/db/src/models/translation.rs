//! Flat key-value translation rows.

use sqlx::FromRow;

/// One `(key, value)` pair for a template and locale.
#[derive(Debug, Clone, FromRow)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
}
