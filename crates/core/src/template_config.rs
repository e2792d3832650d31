//! Typed view over the template configuration document.
//!
//! The stored config is a loose JSON object, but the parts the server acts on
//! (section toggles, theme, maintenance copy) are parsed into typed structs
//! with defaulted fields so a missing section resolves to a known value.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current config schema version written by the default providers.
pub const CONFIG_SCHEMA_VERSION: u64 = 1;

/// Maximum serialized size of a stored config document.
pub const MAX_CONFIG_BYTES: usize = 512 * 1024;

/// Top-level sections a complete config carries.
pub const KNOWN_SECTIONS: &[&str] = &[
    "couple",
    "wedding",
    "hero",
    "countdown",
    "calendar",
    "locations",
    "timeline",
    "rsvp",
    "photos",
    "navigation",
    "footer",
    "email",
    "theme",
    "sections",
    "maintenance",
];

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Section toggles
// ---------------------------------------------------------------------------

/// Which optional page sections are rendered. Every section defaults to on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionToggles {
    pub hero: bool,
    pub countdown: bool,
    pub calendar: bool,
    pub locations: bool,
    pub timeline: bool,
    pub rsvp: bool,
    pub photos: bool,
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self {
            hero: true,
            countdown: true,
            calendar: true,
            locations: true,
            timeline: true,
            rsvp: true,
            photos: true,
        }
    }
}

impl SectionToggles {
    /// `(section name, enabled)` pairs in render order.
    pub fn entries(&self) -> [(&'static str, bool); 7] {
        [
            ("hero", self.hero),
            ("countdown", self.countdown),
            ("calendar", self.calendar),
            ("locations", self.locations),
            ("timeline", self.timeline),
            ("rsvp", self.rsvp),
            ("photos", self.photos),
        ]
    }

    /// Read toggles out of a config, falling back to all-enabled when the
    /// `sections` object is absent or malformed.
    pub fn from_config(config: &Value) -> Self {
        config
            .get("sections")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Colors and fonts applied to a rendered site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: String,
    pub body_font: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#8b6f5c".into(),
            secondary_color: "#f5efe6".into(),
            accent_color: "#c9a96e".into(),
            background_color: "#ffffff".into(),
            text_color: "#333333".into(),
            heading_font: "Playfair Display".into(),
            body_font: "Lato".into(),
        }
    }
}

impl ThemeConfig {
    fn colors(&self) -> [(&'static str, &str); 5] {
        [
            ("primaryColor", &self.primary_color),
            ("secondaryColor", &self.secondary_color),
            ("accentColor", &self.accent_color),
            ("backgroundColor", &self.background_color),
            ("textColor", &self.text_color),
        ]
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a config document submitted by an editor before it is stored.
pub fn validate_config(config: &Value) -> Result<(), CoreError> {
    let obj = config
        .as_object()
        .ok_or_else(|| CoreError::Validation("config must be a JSON object".to_string()))?;

    let size = serde_json::to_vec(config)
        .map_err(|e| CoreError::Validation(format!("config is not serializable: {e}")))?
        .len();
    if size > MAX_CONFIG_BYTES {
        return Err(CoreError::Validation(format!(
            "config exceeds maximum size of {MAX_CONFIG_BYTES} bytes (got {size})"
        )));
    }

    if let Some(version) = obj.get("schemaVersion") {
        match version.as_u64() {
            Some(v) if v <= CONFIG_SCHEMA_VERSION => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "schemaVersion must be an integer no greater than {CONFIG_SCHEMA_VERSION}"
                )))
            }
        }
    }

    if let Some(sections) = obj.get("sections") {
        serde_json::from_value::<SectionToggles>(sections.clone())
            .map_err(|e| CoreError::Validation(format!("invalid 'sections': {e}")))?;
    }

    if let Some(theme) = obj.get("theme") {
        let theme: ThemeConfig = serde_json::from_value(theme.clone())
            .map_err(|e| CoreError::Validation(format!("invalid 'theme': {e}")))?;
        for (name, color) in theme.colors() {
            if !color.is_empty() && !HEX_COLOR_RE.is_match(color) {
                return Err(CoreError::Validation(format!(
                    "theme.{name} must be a hex color like #aabbcc (got '{color}')"
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Stamp `enabled: bool` into every toggleable section object so renderers
/// need not consult `sections` separately.
pub fn apply_section_toggles(config: &mut Value) {
    let toggles = SectionToggles::from_config(config);
    let Some(obj) = config.as_object_mut() else {
        return;
    };
    for (name, enabled) in toggles.entries() {
        if let Some(Value::Object(section)) = obj.get_mut(name) {
            section.insert("enabled".to_string(), Value::Bool(enabled));
        }
    }
}

/// The maintenance page copy exposed while a site is locked. Any key that
/// mentions a password is stripped.
pub fn maintenance_view(config: &Value) -> Value {
    let mut out = Map::new();
    if let Some(Value::Object(section)) = config.get("maintenance") {
        for (key, value) in section {
            if !key.to_ascii_lowercase().contains("password") {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}
