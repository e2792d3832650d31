//! HTTP-level tests for orders and the admin-panel grants they produce.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_template, create_user, get_auth, post_json_auth, put_json_auth, token_for};
use serde_json::json;
use sqlx::PgPool;
use wedsite_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_an_ultimate_order_grants_the_admin_panel(pool: PgPool) {
    let template = create_template(&pool, "bought", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let customer = create_user(&pool, "buyer@example.com", ROLE_CUSTOMER).await;
    let admin_token = token_for(&admin);
    let customer_token = token_for(&customer);
    let app = common::build_test_app(pool);
    let rsvps_uri = format!("/api/templates/{}/rsvps", template.id);

    let before = get_auth(app.clone(), &rsvps_uri, &customer_token).await;
    assert_eq!(before.status(), StatusCode::FORBIDDEN);

    let created = post_json_auth(
        app.clone(),
        "/api/admin/orders",
        json!({
            "userId": customer.id,
            "templateId": template.id,
            "templatePlan": "Ultimate",
            "amountCents": 29900,
            "currency": "eur"
        }),
        &admin_token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let order = body_json(created).await["data"].clone();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["templatePlan"], "ultimate");
    assert_eq!(order["currency"], "EUR");
    let order_id = order["id"].as_i64().unwrap();

    let pending = get_auth(app.clone(), &rsvps_uri, &customer_token).await;
    assert_eq!(pending.status(), StatusCode::FORBIDDEN);

    let complete_uri = format!("/api/admin/orders/{order_id}/complete");
    let completed = post_json_auth(app.clone(), &complete_uri, json!({}), &admin_token).await;
    assert_eq!(completed.status(), StatusCode::OK);
    let json = body_json(completed).await;
    assert_eq!(json["data"]["order"]["status"], "completed");
    assert_eq!(json["data"]["grant"]["templateSlug"], "bought");

    let again = post_json_auth(app.clone(), &complete_uri, json!({}), &admin_token).await;
    assert_eq!(again.status(), StatusCode::OK);

    let after = get_auth(app.clone(), &rsvps_uri, &customer_token).await;
    assert_eq!(after.status(), StatusCode::OK);

    let panels = body_json(get_auth(app.clone(), "/api/auth/admin-panels", &customer_token).await).await;
    assert_eq!(panels["data"].as_array().unwrap().len(), 1);
    assert_eq!(panels["data"][0]["orderStatus"], "completed");

    let mine = body_json(get_auth(app, "/api/auth/orders", &customer_token).await).await;
    assert_eq!(mine["data"][0]["id"], order_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refunding_revokes_access(pool: PgPool) {
    let template = create_template(&pool, "refunded", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let customer = create_user(&pool, "buyer@example.com", ROLE_CUSTOMER).await;
    let admin_token = token_for(&admin);
    let customer_token = token_for(&customer);
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/admin/orders",
        json!({ "userId": customer.id, "templateId": template.id, "templatePlan": "ultimate", "amountCents": 100 }),
        &admin_token,
    )
    .await;
    let order_id = body_json(created).await["data"]["id"].as_i64().unwrap();
    post_json_auth(app.clone(), &format!("/api/admin/orders/{order_id}/complete"), json!({}), &admin_token).await;

    let rsvps_uri = format!("/api/templates/{}/rsvps", template.id);
    assert_eq!(get_auth(app.clone(), &rsvps_uri, &customer_token).await.status(), StatusCode::OK);

    let refunded = put_json_auth(
        app.clone(),
        &format!("/api/admin/orders/{order_id}/status"),
        json!({ "status": "refunded" }),
        &admin_token,
    )
    .await;
    assert_eq!(refunded.status(), StatusCode::OK);
    assert_eq!(body_json(refunded).await["data"]["status"], "refunded");

    assert_eq!(get_auth(app.clone(), &rsvps_uri, &customer_token).await.status(), StatusCode::FORBIDDEN);

    let recomplete = post_json_auth(
        app,
        &format!("/api/admin/orders/{order_id}/complete"),
        json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(recomplete.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_ultimate_plans_never_grant(pool: PgPool) {
    let template = create_template(&pool, "premium-only", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let customer = create_user(&pool, "buyer@example.com", ROLE_CUSTOMER).await;
    let admin_token = token_for(&admin);
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/admin/orders",
        json!({ "userId": customer.id, "templateId": template.id, "templatePlan": "premium", "amountCents": 100 }),
        &admin_token,
    )
    .await;
    let order_id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let completed =
        post_json_auth(app.clone(), &format!("/api/admin/orders/{order_id}/complete"), json!({}), &admin_token).await;
    assert_eq!(completed.status(), StatusCode::OK);
    assert!(body_json(completed).await["data"]["grant"].is_null());

    let denied = get_auth(app, &format!("/api/templates/{}/rsvps", template.id), &token_for(&customer)).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_endpoints_validate_and_require_admin(pool: PgPool) {
    let template = create_template(&pool, "validated", json!({})).await;
    let admin = create_user(&pool, "root@example.com", ROLE_ADMIN).await;
    let customer = create_user(&pool, "buyer@example.com", ROLE_CUSTOMER).await;
    let app = common::build_test_app(pool);
    let order = |plan: &str| {
        json!({ "userId": customer.id, "templateId": template.id, "templatePlan": plan, "amountCents": 100 })
    };

    let forbidden = post_json_auth(app.clone(), "/api/admin/orders", order("ultimate"), &token_for(&customer)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let bad_plan = post_json_auth(app.clone(), "/api/admin/orders", order("platinum"), &token_for(&admin)).await;
    assert_eq!(bad_plan.status(), StatusCode::BAD_REQUEST);

    let missing = post_json_auth(app, "/api/admin/orders/999999/complete", json!({}), &token_for(&admin)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
