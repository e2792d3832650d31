//! Tests for the public maintenance-status endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_template, get};
use serde_json::json;
use sqlx::PgPool;
use wedsite_core::types::new_template_id;
use wedsite_db::models::template::CreateTemplate;
use wedsite_db::repositories::TemplateRepo;

#[tokio::test]
async fn unreachable_database_reports_disabled_with_warning() {
    let app = common::build_test_app(common::unreachable_pool());

    let response = get(app, "/api/maintenance").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["enabled"], false);
    assert!(json["warning"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn no_main_template_reports_disabled(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/maintenance").await).await;
    assert_eq!(json, json!({ "enabled": false }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn defaults_to_the_main_template(pool: PgPool) {
    let main = TemplateRepo::create(
        &pool,
        &CreateTemplate {
            id: new_template_id(),
            name: "Main".to_string(),
            slug: "main-site".to_string(),
            template_key: "classic".to_string(),
            owner_email: None,
            config: json!({}),
            source_template_id: None,
            is_main: true,
        },
    )
    .await
    .unwrap();
    let other = create_template(&pool, "other-site", json!({})).await;
    TemplateRepo::set_maintenance(&pool, &main.id, true, None)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/maintenance").await).await;
    assert_eq!(json["enabled"], true);

    let json = body_json(get(app.clone(), &format!("/api/maintenance?template={}", other.id)).await).await;
    assert_eq!(json["enabled"], false);

    let json = body_json(get(app, "/api/maintenance?template=main-site").await).await;
    assert_eq!(json["enabled"], true);
}
