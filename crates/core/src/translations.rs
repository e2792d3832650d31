//! Default UI strings for public sites and locale validation.
//!
//! Stored translations are sparse; they are merged over [`default_translations`]
//! with [`crate::config_merge::merge_with_defaults`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::error::CoreError;

static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(?:-[A-Z]{2})?$").expect("valid regex"));

/// Validate a locale tag such as `en` or `pt-BR`.
pub fn validate_locale(locale: &str) -> Result<(), CoreError> {
    if LOCALE_RE.is_match(locale) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid locale '{locale}'. Expected a tag like 'en' or 'pt-BR'"
        )))
    }
}

/// Most flattened keys one locale may store.
pub const MAX_TRANSLATION_KEYS: usize = 2_000;

/// Longest accepted dotted key.
pub const MAX_TRANSLATION_KEY_LENGTH: usize = 256;

/// Longest numeric path segment; longer digit runs are rejected outright.
pub const MAX_NUMERIC_SEGMENT_DIGITS: usize = 4;

/// Bound a flattened translation document before it is stored.
pub fn validate_translation_entries(entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
    if entries.len() > MAX_TRANSLATION_KEYS {
        return Err(CoreError::Validation(format!(
            "Too many translation keys ({}); at most {MAX_TRANSLATION_KEYS} are allowed",
            entries.len()
        )));
    }
    for key in entries.keys() {
        if key.len() > MAX_TRANSLATION_KEY_LENGTH {
            return Err(CoreError::Validation(format!(
                "Translation key exceeds {MAX_TRANSLATION_KEY_LENGTH} characters"
            )));
        }
        let oversized_number = key
            .split(crate::config_merge::KEY_SEPARATOR)
            .any(|s| s.len() > MAX_NUMERIC_SEGMENT_DIGITS && s.bytes().all(|b| b.is_ascii_digit()));
        if oversized_number {
            return Err(CoreError::Validation(format!(
                "Translation key '{key}' has a numeric segment longer than {MAX_NUMERIC_SEGMENT_DIGITS} digits"
            )));
        }
    }
    Ok(())
}

/// The full translation shape with English defaults.
pub fn default_translations() -> Value {
    json!({
        "navigation": {
            "home": "Home",
            "countdown": "Countdown",
            "locations": "Locations",
            "timeline": "Schedule",
            "rsvp": "RSVP",
            "photos": "Photos"
        },
        "countdown": {
            "days": "Days",
            "hours": "Hours",
            "minutes": "Minutes",
            "seconds": "Seconds",
            "finished": "Today is the day!"
        },
        "rsvp": {
            "title": "RSVP",
            "firstName": "First name",
            "lastName": "Last name",
            "email": "Email",
            "guestCount": "Number of guests",
            "guestNames": "Guest names",
            "attending": "Joyfully accepts",
            "notAttending": "Regretfully declines",
            "submit": "Send",
            "success": "Thank you for your response!",
            "alreadySubmitted": "You have already submitted an RSVP.",
            "errors": {
                "required": "This field is required",
                "email": "Please enter a valid email address"
            }
        },
        "calendar": {
            "addToCalendar": "Add to calendar"
        },
        "footer": {
            "madeWith": "Made with love"
        },
        "maintenance": {
            "title": "Coming soon",
            "password": "Password",
            "unlock": "Enter"
        }
    })
}
