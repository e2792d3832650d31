//! URL slug validation and generation for template sites.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 63;

/// Slugs that would shadow server routes.
pub const RESERVED_SLUGS: &[&str] = &["api", "admin", "health", "uploads", "static", "assets"];

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Validate a slug: lowercase alphanumerics separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be between {MIN_SLUG_LENGTH} and {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' may only contain lowercase letters, digits and single hyphens"
        )));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(CoreError::Validation(format!("Slug '{slug}' is reserved")));
    }
    Ok(())
}

/// Derive a slug candidate from a free-form name. The result may still need
/// a uniqueness suffix and should be passed through [`validate_slug`].
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    out.truncate(MAX_SLUG_LENGTH);
    out.trim_end_matches('-').to_string()
}
