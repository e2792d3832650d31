/// Database primary keys for every table except `templates` are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Templates are addressed by an opaque text id so it can appear in public URLs.
pub type TemplateId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh opaque template id (time-ordered UUID v7, simple form).
pub fn new_template_id() -> TemplateId {
    uuid::Uuid::now_v7().simple().to_string()
}
