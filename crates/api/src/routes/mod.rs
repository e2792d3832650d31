pub mod admin;
pub mod auth;
pub mod health;
pub mod maintenance;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                                       list (public), create (platform admin)
/// /templates/{template_id}                         delete (platform admin)
/// /templates/{template_id}/config                  resolve (public, id or slug), replace (gate)
/// /templates/{template_id}/maintenance             toggle maintenance (gate)
/// /templates/{template_id}/unlock                  unlock with maintenance password (public)
/// /templates/{template_id}/activity                activity log (gate)
/// /templates/{template_id}/rsvp                    submit RSVP (public)
/// /templates/{template_id}/rsvps                   list with stats (gate)
/// /templates/{template_id}/rsvps/{rsvp_id}         delete (gate)
/// /templates/{template_id}/images                  list (public)
/// /templates/{template_id}/photos/upload           multipart upload (gate)
/// /templates/{template_id}/images/order            reorder (gate)
/// /templates/{template_id}/images/{image_id}       delete (gate)
/// /templates/{template_id}/translations/{locale}   get (public), replace (gate)
///
/// /auth/register                                   register
/// /auth/login                                      login
/// /auth/verify-email                               redeem verification token
/// /auth/forgot-password                            email a reset link
/// /auth/reset-password                             redeem reset token
/// /auth/me                                         current user (requires auth)
/// /auth/logout                                     logout (requires auth)
/// /auth/admin-panels                               caller's grants (requires auth)
/// /auth/orders                                     caller's orders (requires auth)
///
/// /admin/orders                                    create (platform admin)
/// /admin/orders/{order_id}/complete                complete and grant (platform admin)
/// /admin/orders/{order_id}/status                  cancel / refund (platform admin)
///
/// /maintenance                                     maintenance flag (public, never fails)
/// ```
///
/// "gate" routes require admin-panel access to the template; see
/// [`AdminPanelAccess`](crate::middleware::entitlement::AdminPanelAccess).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .merge(maintenance::router())
}
