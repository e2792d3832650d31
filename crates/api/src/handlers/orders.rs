//! Handlers for template purchases.
//!
//! Completing an `ultimate` order grants its buyer the admin panel of the
//! purchased template; moving an order out of `completed` revokes it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wedsite_core::entitlement::{
    order_includes_admin_panel, validate_order_status, validate_plan, ORDER_COMPLETED,
};
use wedsite_core::error::CoreError;
use wedsite_core::types::DbId;
use wedsite_db::models::activity_log::ACTION_ORDER_COMPLETED;
use wedsite_db::models::admin_panel::UserAdminPanel;
use wedsite_db::models::order::{CreateOrder, Order};
use wedsite_db::repositories::{AdminPanelRepo, OrderRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::activity;
use crate::handlers::templates::load_by_id;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /api/admin/orders/{order_id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}

/// An order together with the admin-panel grant it produced, if any.
#[derive(Debug, Serialize)]
pub struct CompletedOrder {
    pub order: Order,
    pub grant: Option<UserAdminPanel>,
}

/// POST /api/admin/orders
pub async fn create_order(
    State(state): State<AppState>,
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    Json(mut input): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<Order>>)> {
    input.template_plan = input.template_plan.trim().to_lowercase();
    validate_plan(&input.template_plan)?;
    if input.amount_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "amountCents must not be negative".into(),
        )));
    }
    if let Some(currency) = input.currency.as_mut() {
        *currency = currency.trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::Core(CoreError::Validation(
                "currency must be a three-letter ISO code".into(),
            )));
        }
    }

    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", input.user_id)))?;
    load_by_id(&state, &input.template_id).await?;

    let order = OrderRepo::create(&state.pool, &input).await?;
    tracing::info!(
        order_id = order.id,
        user_id = order.user_id,
        template_id = %order.template_id,
        plan = %order.template_plan,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// POST /api/admin/orders/{order_id}/complete
///
/// Marks a pending order completed. Completing an already completed order
/// re-applies its grant; any other status is a conflict.
pub async fn complete_order(
    State(state): State<AppState>,
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompletedOrder>>> {
    let order = match OrderRepo::complete(&state.pool, order_id).await? {
        Some(order) => order,
        None => {
            let existing = OrderRepo::find_by_id(&state.pool, order_id)
                .await?
                .ok_or_else(|| AppError::Core(CoreError::not_found("Order", order_id)))?;
            if existing.status != ORDER_COMPLETED {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Order {order_id} is {} and cannot be completed",
                    existing.status
                ))));
            }
            existing
        }
    };

    let grant = if order_includes_admin_panel(&order.status, &order.template_plan) {
        let template = load_by_id(&state, &order.template_id).await?;
        let grant = AdminPanelRepo::grant(
            &state.pool,
            order.user_id,
            &template.id,
            &template.slug,
            order.id,
        )
        .await?;
        tracing::info!(order_id = order.id, grant_id = grant.id, "Admin panel granted");
        Some(grant)
    } else {
        None
    };

    activity::record(
        &state,
        Some(admin.user_id),
        Some(&order.template_id),
        ACTION_ORDER_COMPLETED,
        json!({ "orderId": order.id, "plan": order.template_plan, "granted": grant.is_some() }),
    )
    .await;

    Ok(Json(DataResponse {
        data: CompletedOrder { order, grant },
    }))
}

/// PUT /api/admin/orders/{order_id}/status
///
/// Sets a cancelled or refunded status and deactivates grants the order backed.
/// Use the complete endpoint to complete an order.
pub async fn set_order_status(
    State(state): State<AppState>,
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    Path(order_id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<Json<DataResponse<Order>>> {
    let status = input.status.trim().to_lowercase();
    validate_order_status(&status)?;
    if status == ORDER_COMPLETED {
        return Err(AppError::Core(CoreError::Validation(
            "Use the complete endpoint to complete an order".into(),
        )));
    }

    let order = OrderRepo::set_status(&state.pool, order_id, &status)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Order", order_id)))?;

    if AdminPanelRepo::deactivate_for_order(&state.pool, order.id).await? {
        tracing::info!(order_id = order.id, status = %order.status, "Admin panel grant revoked");
    }

    Ok(Json(DataResponse { data: order }))
}

/// GET /api/auth/orders
///
/// The caller's own orders, newest first.
pub async fn my_orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let orders = OrderRepo::list_by_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}
