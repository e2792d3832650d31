//! HTTP-level tests for RSVP intake and administration.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, create_template, customer_with_order, delete_auth, get_auth, post_json, rsvp_body,
    token_for,
};
use serde_json::json;
use sqlx::PgPool;
use wedsite_core::entitlement::PLAN_ULTIMATE;
use wedsite_db::repositories::{RsvpRepo, TemplateRepo};

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_submission_for_same_email_is_rejected(pool: PgPool) {
    let template = create_template(&pool, "abc123", json!({})).await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/templates/{}/rsvp", template.id);

    let first = post_json(app.clone(), &uri, rsvp_body("ann@example.com")).await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["rsvp"]["attendance"], "attending");
    assert_eq!(json["rsvp"]["firstName"], "Ann");
    assert!(json["rsvp"].get("email").is_none(), "receipt must not echo the email");

    let second = post_json(app.clone(), &uri, rsvp_body("ann@example.com")).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["code"], "ALREADY_SUBMITTED");

    let differently_cased = post_json(app, &uri, rsvp_body("  ANN@Example.com ")).await;
    assert_eq!(differently_cased.status(), StatusCode::BAD_REQUEST);

    let stored = RsvpRepo::list_by_template(&pool, &template.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rsvp_by_slug_is_accepted(pool: PgPool) {
    create_template(&pool, "by-slug", json!({})).await;
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/templates/by-slug/rsvp", rsvp_body("cara@example.com")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_duplicates_store_one_row(pool: PgPool) {
    let template = create_template(&pool, "racy", json!({})).await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/templates/{}/rsvp", template.id);

    let (a, b) = tokio::join!(
        post_json(app.clone(), &uri, rsvp_body("race@example.com")),
        post_json(app, &uri, rsvp_body("race@example.com")),
    );
    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 400]);

    let stats = RsvpRepo::stats(&pool, &template.id).await.unwrap();
    assert_eq!(stats.total, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn maintenance_blocks_submissions(pool: PgPool) {
    let template = create_template(&pool, "closed", json!({})).await;
    TemplateRepo::set_maintenance(&pool, &template.id, true, None)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/templates/closed/rsvp", rsvp_body("ann@example.com")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "MAINTENANCE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_payload_lists_field_errors(pool: PgPool) {
    create_template(&pool, "strict", json!({})).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/templates/strict/rsvp",
        json!({ "firstName": "", "lastName": "Lee", "email": "not-an-email", "guestCount": "1", "attendance": "attending" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"firstName"));
    assert!(!fields.contains(&"lastName"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_template_rsvp_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/templates/nobody/rsvp", rsvp_body("ann@example.com")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_lists_and_deletes_rsvps(pool: PgPool) {
    let template = create_template(&pool, "owned", json!({})).await;
    let owner = customer_with_order(&pool, &template, PLAN_ULTIMATE).await;
    let token = token_for(&owner);
    let app = common::build_test_app(pool);
    let submit_uri = format!("/api/templates/{}/rsvp", template.id);

    post_json(app.clone(), &submit_uri, rsvp_body("ann@example.com")).await;
    let mut declined = rsvp_body("bob@example.com");
    declined["attendance"] = json!("not-attending");
    declined["guestCount"] = json!("0");
    post_json(app.clone(), &submit_uri, declined).await;

    let listing = get_auth(app.clone(), &format!("/api/templates/{}/rsvps", template.id), &token).await;
    assert_eq!(listing.status(), StatusCode::OK);
    let json = body_json(listing).await;
    assert_eq!(json["data"]["rsvps"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["stats"]["total"], 2);
    assert_eq!(json["data"]["stats"]["attending"], 1);
    assert_eq!(json["data"]["stats"]["notAttending"], 1);
    assert_eq!(json["data"]["stats"]["guestTotal"], 2);

    let ann_id = json["data"]["rsvps"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["email"] == "ann@example.com")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let deleted = delete_auth(
        app.clone(),
        &format!("/api/templates/{}/rsvps/{ann_id}", template.id),
        &token,
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    // The email is free again.
    let again = post_json(app, &submit_uri, rsvp_body("ann@example.com")).await;
    assert_eq!(again.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failing_smtp_does_not_fail_the_submission(pool: PgPool) {
    let template = create_template(&pool, "mail-down", json!({})).await;
    let config = common::test_config();
    let state = common::test_state(pool.clone(), config.clone(), Some(common::unreachable_mailer()));
    let app = wedsite_api::router::build_app_router(state.clone(), &config);

    let response = post_json(
        app,
        &format!("/api/templates/{}/rsvp", template.id),
        rsvp_body("ann@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rsvp"]["firstName"], "Ann");

    // The guest confirmation send fails against the dead port; the task still finishes.
    assert!(state.drain_background(Duration::from_secs(30)).await);
    assert!(state.background.is_empty());

    let stored = RsvpRepo::list_by_template(&pool, &template.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "ann@example.com");
}
