//! HTTP-level tests for template listing, administration and config resolution.

mod common;

use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use common::{
    body_json, create_template, create_user, get, post_json, post_json_auth, put_json_auth,
    token_for,
};
use serde_json::json;
use sqlx::PgPool;
use wedsite_api::auth::password::hash_password;
use wedsite_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use wedsite_db::models::image::CreateTemplateImage;
use wedsite_db::repositories::{TemplateImageRepo, TemplateRepo};

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_template_config_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/templates/does-not-exist/config").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn id_and_slug_resolve_to_the_same_payload(pool: PgPool) {
    let template = create_template(&pool, "ann-and-ben", json!({ "couple": { "brideName": "Ann" } })).await;
    let app = common::build_test_app(pool);

    let by_id = get(app.clone(), &format!("/api/templates/{}/config", template.id)).await;
    assert_eq!(by_id.status(), StatusCode::OK);
    assert_eq!(
        by_id.headers().get(CACHE_CONTROL).unwrap(),
        "public, max-age=300"
    );
    let by_id = body_json(by_id).await;

    let by_slug = body_json(get(app, "/api/templates/ann-and-ben/config").await).await;

    assert_eq!(by_id, by_slug);
    assert_eq!(by_id["templateId"], template.id);
    assert_eq!(by_id["templateKey"], "classic");
    assert_eq!(by_id["maintenance"], false);
    assert_eq!(by_id["config"]["couple"]["brideName"], "Ann");
    // Missing sections come from the theme defaults.
    assert!(by_id["config"]["rsvp"]["title"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slug_lookup_is_case_sensitive(pool: PgPool) {
    create_template(&pool, "ann-and-ben", json!({})).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/templates/Ann-And-Ben/config").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn maintenance_withholds_content_config(pool: PgPool) {
    let template = create_template(
        &pool,
        "locked-site",
        json!({ "couple": { "brideName": "Secret" }, "maintenance": { "title": "Soon", "password": "x" } }),
    )
    .await;
    TemplateRepo::set_maintenance(&pool, &template.id, true, None)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get(app, "/api/templates/locked-site/config").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");

    let json = body_json(response).await;
    assert_eq!(json["maintenance"], true);
    assert!(json.get("config").is_none(), "full config must not be exposed");
    assert_eq!(json["maintenanceConfig"]["title"], "Soon");
    assert!(json["maintenanceConfig"].get("password").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn uploaded_images_override_only_non_empty_categories(pool: PgPool) {
    let template = create_template(
        &pool,
        "with-images",
        json!({
            "hero": { "images": ["/baked/hero.jpg"] },
            "photos": { "images": ["/baked/gallery.jpg"] }
        }),
    )
    .await;
    TemplateImageRepo::create(
        &pool,
        &CreateTemplateImage {
            template_id: template.id.clone(),
            url: "/uploads/hero-1.jpg".to_string(),
            object_key: "templates/x/hero-1.jpg".to_string(),
            name: "hero-1.jpg".to_string(),
            category: "hero".to_string(),
            size: Some(10),
            mime_type: Some("image/jpeg".to_string()),
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/templates/with-images/config").await).await;

    assert_eq!(json["config"]["hero"]["images"], json!(["/uploads/hero-1.jpg"]));
    assert_eq!(json["config"]["photos"]["images"], json!(["/baked/gallery.jpg"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn config_update_requires_gate_and_validates(pool: PgPool) {
    let template = create_template(&pool, "editable", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);
    let uri = format!("/api/templates/{}/config", template.id);

    let invalid = put_json_auth(app.clone(), &uri, json!({ "theme": { "primaryColor": "red" } }), &token).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let ok = put_json_auth(app.clone(), &uri, json!({ "footer": { "text": "" } }), &token).await;
    assert_eq!(ok.status(), StatusCode::OK);

    let resolved = body_json(get(app, &uri).await).await;
    assert_eq!(resolved["config"]["footer"]["text"], "");
}

// ---------------------------------------------------------------------------
// Listing and administration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_includes_rsvp_counts(pool: PgPool) {
    let template = create_template(&pool, "listed", json!({})).await;
    let app = common::build_test_app(pool);

    let rsvp = post_json(
        app.clone(),
        &format!("/api/templates/{}/rsvp", template.id),
        common::rsvp_body("guest@example.com"),
    )
    .await;
    assert_eq!(rsvp.status(), StatusCode::OK);

    let json = body_json(get(app, "/api/templates").await).await;
    assert!(json.get("warning").is_none());
    let row = &json["data"][0];
    assert_eq!(row["slug"], "listed");
    assert_eq!(row["rsvpTotal"], 1);
    assert_eq!(row["rsvpAttending"], 1);
    assert_eq!(row["guestTotal"], 2);
}

#[tokio::test]
async fn list_degrades_to_empty_when_database_is_down() {
    let app = common::build_test_app(common::unreachable_pool());

    let response = get(app, "/api/templates").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
    assert!(json["warning"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_platform_admins_create_templates(pool: PgPool) {
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let customer = create_user(&pool, "buyer@example.com", ROLE_CUSTOMER).await;
    let app = common::build_test_app(pool);
    let body = json!({ "name": "Cara & Dan", "templateKey": "garden" });

    let denied = post_json_auth(app.clone(), "/api/templates", body.clone(), &token_for(&customer)).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = post_json_auth(app.clone(), "/api/templates", body.clone(), &token_for(&admin)).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let json = body_json(created).await;
    assert_eq!(json["data"]["slug"], "cara-dan");
    assert_eq!(json["data"]["templateKey"], "garden");
    assert!(json["data"].get("maintenancePassword").is_none());

    let duplicate = post_json_auth(app, "/api/templates", body, &token_for(&admin)).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_template_key_is_rejected(pool: PgPool) {
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/templates",
        json!({ "name": "Eve", "slug": "eve-wedding", "templateKey": "brutalist" }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clone_copies_source_config(pool: PgPool) {
    let source = create_template(&pool, "source-site", json!({ "footer": { "text": "Made with love" } })).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/templates",
        json!({ "name": "Copy", "slug": "copy-site", "sourceTemplateId": source.id }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let json = body_json(get(app, "/api/templates/copy-site/config").await).await;
    assert_eq!(json["config"]["footer"]["text"], "Made with love");
}

// ---------------------------------------------------------------------------
// Maintenance unlock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlock_requires_matching_password(pool: PgPool) {
    let template = create_template(&pool, "preview-me", json!({ "couple": { "groomName": "Ben" } })).await;
    let hash = hash_password("letmein").unwrap();
    TemplateRepo::set_maintenance(&pool, &template.id, true, Some(Some(&hash)))
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let wrong = post_json(app.clone(), "/api/templates/preview-me/unlock", json!({ "password": "nope" })).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let right = post_json(app, "/api/templates/preview-me/unlock", json!({ "password": "letmein" })).await;
    assert_eq!(right.status(), StatusCode::OK);
    let json = body_json(right).await;
    assert_eq!(json["config"]["couple"]["groomName"], "Ben");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlock_without_password_set_is_rejected(pool: PgPool) {
    let template = create_template(&pool, "no-password", json!({})).await;
    TemplateRepo::set_maintenance(&pool, &template.id, true, None)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/templates/no-password/unlock", json!({ "password": "" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gate_holder_toggles_maintenance(pool: PgPool) {
    let template = create_template(&pool, "toggle-me", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app.clone(),
        &format!("/api/templates/{}/maintenance", template.id),
        json!({ "enabled": true, "password": "preview" }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = TemplateRepo::find_by_id(&pool, &template.id).await.unwrap().unwrap();
    assert!(stored.maintenance);
    assert!(stored.maintenance_password.is_some());

    let status = body_json(get(app, "/api/maintenance?template=toggle-me").await).await;
    assert_eq!(status["enabled"], true);
}
