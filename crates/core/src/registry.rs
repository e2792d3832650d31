//! Registry of visual template themes and their default configurations.
//!
//! Each `template_key` stored on a template row names a provider registered
//! here. Adding a theme is a `register` call; resolution never branches on
//! the key string itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config_merge::merge_with_defaults;
use crate::error::CoreError;
use crate::template_config::{SectionToggles, ThemeConfig, CONFIG_SCHEMA_VERSION};

/// Key used when a stored template names a theme that is no longer registered.
pub const FALLBACK_TEMPLATE_KEY: &str = "classic";

/// Supplies the complete default configuration for one template theme.
pub trait DefaultConfigProvider: Send + Sync {
    /// Stable identifier stored in `templates.template_key`.
    fn key(&self) -> &'static str;

    /// Human-facing theme name.
    fn display_name(&self) -> &'static str;

    /// Full default config, carrying every known section.
    fn default_config(&self) -> Value;
}

/// A built-in theme: the shared base document with a theme-specific overlay.
pub struct BuiltinTheme {
    key: &'static str,
    name: &'static str,
    overlay: fn() -> Value,
}

impl DefaultConfigProvider for BuiltinTheme {
    fn key(&self) -> &'static str {
        self.key
    }

    fn display_name(&self) -> &'static str {
        self.name
    }

    fn default_config(&self) -> Value {
        merge_with_defaults(&base_config(), &(self.overlay)())
    }
}

/// Lookup table from template key to default-config provider.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    providers: BTreeMap<&'static str, Arc<dyn DefaultConfigProvider>>,
}

impl TemplateRegistry {
    /// Registry pre-populated with the themes shipped with the platform.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for theme in [
            BuiltinTheme { key: "classic", name: "Classic", overlay: classic_overlay },
            BuiltinTheme { key: "elegant", name: "Elegant", overlay: elegant_overlay },
            BuiltinTheme { key: "garden", name: "Garden", overlay: garden_overlay },
            BuiltinTheme { key: "minimal", name: "Minimal", overlay: minimal_overlay },
        ] {
            registry
                .register(theme)
                .expect("built-in template keys are distinct");
        }
        registry
    }

    /// Add a provider. Fails if the key is already taken.
    pub fn register<P>(&mut self, provider: P) -> Result<(), CoreError>
    where
        P: DefaultConfigProvider + 'static,
    {
        let key = provider.key();
        if self.providers.contains_key(key) {
            return Err(CoreError::Conflict(format!(
                "template key '{key}' is already registered"
            )));
        }
        self.providers.insert(key, Arc::new(provider));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn DefaultConfigProvider>> {
        self.providers.get(key)
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.providers.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    /// Default config for `key`, using the fallback theme for unknown keys.
    pub fn defaults_for(&self, key: &str) -> Value {
        self.get(key)
            .or_else(|| self.get(FALLBACK_TEMPLATE_KEY))
            .map(|p| p.default_config())
            .unwrap_or_else(base_config)
    }

    /// Merge a stored config over the defaults of its theme.
    pub fn resolve_config(&self, key: &str, stored: &Value) -> Value {
        merge_with_defaults(&self.defaults_for(key), stored)
    }

    /// Reject keys that are not registered.
    pub fn ensure_registered(&self, key: &str) -> Result<(), CoreError> {
        if self.is_registered(key) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Unknown template key '{key}'. Must be one of: {:?}",
                self.keys()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Default documents
// ---------------------------------------------------------------------------

/// The shared base document every theme starts from.
pub fn base_config() -> Value {
    json!({
        "schemaVersion": CONFIG_SCHEMA_VERSION,
        "couple": {
            "brideName": "",
            "groomName": "",
            "hashtag": ""
        },
        "wedding": {
            "date": "",
            "time": "",
            "timezone": "UTC"
        },
        "hero": {
            "title": "We're getting married",
            "subtitle": "Save the date",
            "images": []
        },
        "countdown": {
            "title": "Counting down to our big day",
            "labels": { "days": "Days", "hours": "Hours", "minutes": "Minutes", "seconds": "Seconds" }
        },
        "calendar": {
            "title": "Add to your calendar",
            "buttonLabel": "Add to calendar"
        },
        "locations": {
            "title": "Where",
            "items": []
        },
        "timeline": {
            "title": "Schedule",
            "events": []
        },
        "rsvp": {
            "title": "RSVP",
            "subtitle": "Please let us know if you can make it",
            "deadline": "",
            "labels": {
                "firstName": "First name",
                "lastName": "Last name",
                "email": "Email",
                "guestCount": "Number of guests",
                "guestNames": "Guest names",
                "attending": "Joyfully accepts",
                "notAttending": "Regretfully declines",
                "submit": "Send"
            },
            "successMessage": "Thank you for your response!",
            "duplicateMessage": "You have already submitted an RSVP."
        },
        "photos": {
            "title": "Gallery",
            "images": []
        },
        "navigation": {
            "items": ["home", "countdown", "locations", "timeline", "rsvp", "photos"]
        },
        "footer": {
            "text": ""
        },
        "email": {
            "recipients": [],
            "notificationSubject": "New RSVP from {firstName} {lastName}",
            "notificationBody": "{firstName} {lastName} ({email}) responded: {attendance}. Guests: {guestCount}. {guestNames}",
            "confirmationSubject": "Thank you for your RSVP",
            "confirmationBody": "Dear {firstName},\n\nWe received your response ({attendance}). See you soon!"
        },
        "theme": ThemeConfig::default(),
        "sections": SectionToggles::default(),
        "maintenance": {
            "title": "Coming soon",
            "message": "Our website is being prepared. Please check back later."
        }
    })
}

fn classic_overlay() -> Value {
    json!({})
}

fn elegant_overlay() -> Value {
    json!({
        "theme": {
            "primaryColor": "#1f2a44",
            "secondaryColor": "#f4f1ea",
            "accentColor": "#b8975a",
            "headingFont": "Cormorant Garamond",
            "bodyFont": "Montserrat"
        },
        "hero": { "subtitle": "Together with their families" }
    })
}

fn garden_overlay() -> Value {
    json!({
        "theme": {
            "primaryColor": "#4f6f52",
            "secondaryColor": "#eef3e8",
            "accentColor": "#d4a5a5",
            "headingFont": "Great Vibes",
            "bodyFont": "Nunito"
        },
        "sections": { "calendar": false }
    })
}

fn minimal_overlay() -> Value {
    json!({
        "theme": {
            "primaryColor": "#111111",
            "secondaryColor": "#fafafa",
            "accentColor": "#999999",
            "headingFont": "Inter",
            "bodyFont": "Inter"
        },
        "sections": { "countdown": false, "timeline": false }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_config::KNOWN_SECTIONS;
    use assert_matches::assert_matches;

    struct Custom;

    impl DefaultConfigProvider for Custom {
        fn key(&self) -> &'static str {
            "custom"
        }
        fn display_name(&self) -> &'static str {
            "Custom"
        }
        fn default_config(&self) -> Value {
            json!({ "hero": { "title": "Custom" } })
        }
    }

    #[test]
    fn builtin_registers_all_themes() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.keys(), vec!["classic", "elegant", "garden", "minimal"]);
    }

    #[test]
    fn every_builtin_default_has_every_section() {
        let registry = TemplateRegistry::builtin();
        for key in registry.keys() {
            let config = registry.defaults_for(key);
            for section in KNOWN_SECTIONS {
                assert!(config.get(*section).is_some(), "{key} is missing {section}");
            }
        }
    }

    #[test]
    fn theme_overlay_keeps_base_fields() {
        let config = TemplateRegistry::builtin().defaults_for("garden");
        assert_eq!(config["theme"]["primaryColor"], "#4f6f52");
        assert_eq!(config["theme"]["textColor"], "#333333");
        assert_eq!(config["sections"]["calendar"], false);
        assert_eq!(config["sections"]["rsvp"], true);
    }

    #[test]
    fn unknown_key_falls_back_to_classic() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.defaults_for("retired-theme"), registry.defaults_for("classic"));
    }

    #[test]
    fn register_adds_new_theme_without_branches() {
        let mut registry = TemplateRegistry::builtin();
        registry.register(Custom).unwrap();
        assert!(registry.is_registered("custom"));
        assert_eq!(registry.defaults_for("custom")["hero"]["title"], "Custom");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TemplateRegistry::default();
        registry.register(Custom).unwrap();
        assert_matches!(registry.register(Custom), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn ensure_registered_rejects_unknown() {
        let registry = TemplateRegistry::builtin();
        assert!(registry.ensure_registered("elegant").is_ok());
        assert_matches!(registry.ensure_registered("neon"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn resolve_config_merges_stored_over_defaults() {
        let registry = TemplateRegistry::builtin();
        let resolved = registry.resolve_config("classic", &json!({ "hero": { "title": "" } }));
        assert_eq!(resolved["hero"]["title"], "");
        assert_eq!(resolved["hero"]["subtitle"], "Save the date");
    }
}
