//! Template resolution: turn a stored template row plus its uploaded images
//! into the payload a public site renders.
//!
//! Lookups happen in the API layer; everything here is pure so the
//! enrichment and maintenance rules can be tested without a database.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::registry::TemplateRegistry;
use crate::template_config::{apply_section_toggles, maintenance_view};

// ---------------------------------------------------------------------------
// Image categories
// ---------------------------------------------------------------------------

/// Images shown in the hero banner.
pub const CATEGORY_HERO: &str = "hero";
/// Images shown in the photo gallery (the default upload category).
pub const CATEGORY_GALLERY: &str = "gallery";
/// Images kept for other uses (backgrounds, etc). Not spliced into the config.
pub const CATEGORY_OTHER: &str = "other";

/// All valid image categories.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_HERO, CATEGORY_GALLERY, CATEGORY_OTHER];

/// Validate an image category name.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image category '{category}'. Must be one of: {VALID_CATEGORIES:?}"
        )))
    }
}

/// Recommended `Cache-Control` max-age for resolved public configs.
pub const CONFIG_CACHE_MAX_AGE_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Image partitioning
// ---------------------------------------------------------------------------

/// Image URLs grouped by the config section they feed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartitionedImages {
    pub hero: Vec<String>,
    pub gallery: Vec<String>,
}

/// Split `(category, url)` pairs into hero and gallery lists, preserving order.
pub fn partition_images<'a, I>(images: I) -> PartitionedImages
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = PartitionedImages::default();
    for (category, url) in images {
        match category {
            CATEGORY_HERO => out.hero.push(url.to_string()),
            CATEGORY_GALLERY => out.gallery.push(url.to_string()),
            _ => {}
        }
    }
    out
}

/// Splice uploaded image URLs into `hero.images` and `photos.images`.
///
/// An empty list leaves the config-embedded images untouched.
pub fn enrich_with_images(config: &mut Value, images: &PartitionedImages) {
    set_section_images(config, "hero", &images.hero);
    set_section_images(config, "photos", &images.gallery);
}

fn set_section_images(config: &mut Value, section: &str, urls: &[String]) {
    if urls.is_empty() {
        return;
    }
    let Some(root) = config.as_object_mut() else {
        return;
    };
    let entry = root
        .entry(section.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(obj) = entry {
        obj.insert(
            "images".to_string(),
            Value::Array(urls.iter().cloned().map(Value::String).collect()),
        );
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The fields of a template row the resolver needs.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSource<'a> {
    pub id: &'a str,
    pub template_key: &'a str,
    pub config: &'a Value,
    pub maintenance: bool,
}

/// Full payload for a live site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedConfig {
    pub template_id: String,
    pub template_key: String,
    pub config: Value,
    pub maintenance: bool,
}

/// Reduced payload for a site in maintenance mode. Never carries the content config.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayload {
    pub template_id: String,
    pub template_key: String,
    pub maintenance: bool,
    pub maintenance_config: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResolvedTemplate {
    Live(EnrichedConfig),
    Maintenance(MaintenancePayload),
}

impl ResolvedTemplate {
    pub fn is_maintenance(&self) -> bool {
        matches!(self, ResolvedTemplate::Maintenance(_))
    }
}

/// Resolve a template. `images` is only consulted for live sites, so callers
/// may pass an empty set when the row is in maintenance.
pub fn resolve(
    source: TemplateSource<'_>,
    registry: &TemplateRegistry,
    images: &PartitionedImages,
) -> ResolvedTemplate {
    let merged = registry.resolve_config(source.template_key, source.config);

    if source.maintenance {
        return ResolvedTemplate::Maintenance(MaintenancePayload {
            template_id: source.id.to_string(),
            template_key: source.template_key.to_string(),
            maintenance: true,
            maintenance_config: maintenance_view(&merged),
        });
    }

    ResolvedTemplate::Live(build_live(source, merged, images))
}

/// Resolve the full config regardless of the maintenance flag (used once a
/// visitor has unlocked a site with its maintenance password).
pub fn resolve_unlocked(
    source: TemplateSource<'_>,
    registry: &TemplateRegistry,
    images: &PartitionedImages,
) -> EnrichedConfig {
    let merged = registry.resolve_config(source.template_key, source.config);
    build_live(source, merged, images)
}

fn build_live(source: TemplateSource<'_>, mut config: Value, images: &PartitionedImages) -> EnrichedConfig {
    enrich_with_images(&mut config, images);
    apply_section_toggles(&mut config);
    EnrichedConfig {
        template_id: source.id.to_string(),
        template_key: source.template_key.to_string(),
        config,
        maintenance: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source<'a>(config: &'a Value, maintenance: bool) -> TemplateSource<'a> {
        TemplateSource {
            id: "abc123",
            template_key: "classic",
            config,
            maintenance,
        }
    }

    #[test]
    fn partition_keeps_order_and_drops_other_categories() {
        let images = partition_images([
            ("gallery", "/g1.jpg"),
            ("hero", "/h1.jpg"),
            ("other", "/bg.jpg"),
            ("gallery", "/g2.jpg"),
        ]);
        assert_eq!(images.hero, vec!["/h1.jpg"]);
        assert_eq!(images.gallery, vec!["/g1.jpg", "/g2.jpg"]);
    }

    #[test]
    fn empty_image_lists_keep_embedded_urls() {
        let mut config = json!({
            "hero": { "images": ["/baked-hero.jpg"] },
            "photos": { "images": ["/baked-1.jpg"] }
        });
        enrich_with_images(&mut config, &PartitionedImages::default());
        assert_eq!(config["hero"]["images"], json!(["/baked-hero.jpg"]));
        assert_eq!(config["photos"]["images"], json!(["/baked-1.jpg"]));
    }

    #[test]
    fn non_empty_lists_override_embedded_urls() {
        let mut config = json!({
            "hero": { "images": ["/baked-hero.jpg"], "title": "Hi" },
            "photos": { "images": ["/baked-1.jpg"] }
        });
        let images = PartitionedImages {
            hero: vec!["/up-hero.jpg".into()],
            gallery: vec![],
        };
        enrich_with_images(&mut config, &images);
        assert_eq!(config["hero"]["images"], json!(["/up-hero.jpg"]));
        assert_eq!(config["hero"]["title"], "Hi");
        assert_eq!(config["photos"]["images"], json!(["/baked-1.jpg"]));
    }

    #[test]
    fn enrichment_creates_missing_section() {
        let mut config = json!({});
        let images = PartitionedImages {
            hero: vec![],
            gallery: vec!["/g.jpg".into()],
        };
        enrich_with_images(&mut config, &images);
        assert_eq!(config, json!({ "photos": { "images": ["/g.jpg"] } }));
    }

    #[test]
    fn maintenance_never_exposes_config() {
        let registry = TemplateRegistry::builtin();
        let stored = json!({
            "couple": { "brideName": "Ann" },
            "maintenance": { "message": "Hold tight", "password": "secret" }
        });
        let resolved = resolve(source(&stored, true), &registry, &PartitionedImages::default());
        assert!(resolved.is_maintenance());

        let body = serde_json::to_value(&resolved).unwrap();
        assert!(body.get("config").is_none());
        assert_eq!(body["maintenance"], true);
        assert_eq!(body["templateId"], "abc123");
        assert_eq!(body["maintenanceConfig"]["message"], "Hold tight");
        assert!(body["maintenanceConfig"].get("password").is_none());
    }

    #[test]
    fn live_payload_is_merged_enriched_and_toggled() {
        let registry = TemplateRegistry::builtin();
        let stored = json!({ "couple": { "brideName": "Ann" }, "sections": { "timeline": false } });
        let images = partition_images([("hero", "/h.jpg")]);
        let body = serde_json::to_value(resolve(source(&stored, false), &registry, &images)).unwrap();

        assert_eq!(body["maintenance"], false);
        assert_eq!(body["templateKey"], "classic");
        assert_eq!(body["config"]["couple"]["brideName"], "Ann");
        assert_eq!(body["config"]["couple"]["groomName"], "");
        assert_eq!(body["config"]["hero"]["images"], json!(["/h.jpg"]));
        assert_eq!(body["config"]["timeline"]["enabled"], false);
        assert_eq!(body["config"]["rsvp"]["enabled"], true);
    }

    #[test]
    fn unlocked_resolution_ignores_maintenance_flag() {
        let registry = TemplateRegistry::builtin();
        let stored = json!({});
        let resolved = resolve_unlocked(source(&stored, true), &registry, &PartitionedImages::default());
        assert!(!resolved.maintenance);
        assert!(resolved.config.get("hero").is_some());
    }

    #[test]
    fn category_validation() {
        assert!(validate_category("hero").is_ok());
        assert!(validate_category("gallery").is_ok());
        assert!(validate_category("banner").is_err());
    }
}
