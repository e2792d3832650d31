//! Admin-panel entitlement rules.
//!
//! A user may edit a template's admin panel only through an active grant
//! backed by a completed order on the `ultimate` plan.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

pub const PLAN_STANDARD: &str = "standard";
pub const PLAN_PREMIUM: &str = "premium";
/// The only plan that includes the admin panel.
pub const PLAN_ULTIMATE: &str = "ultimate";

pub const VALID_PLANS: &[&str] = &[PLAN_STANDARD, PLAN_PREMIUM, PLAN_ULTIMATE];

// ---------------------------------------------------------------------------
// Order statuses
// ---------------------------------------------------------------------------

pub const ORDER_PENDING: &str = "pending";
pub const ORDER_COMPLETED: &str = "completed";
pub const ORDER_CANCELLED: &str = "cancelled";
pub const ORDER_REFUNDED: &str = "refunded";

pub const VALID_ORDER_STATUSES: &[&str] =
    &[ORDER_PENDING, ORDER_COMPLETED, ORDER_CANCELLED, ORDER_REFUNDED];

// ---------------------------------------------------------------------------
// Gate messages
// ---------------------------------------------------------------------------

pub const MSG_TOKEN_REQUIRED: &str = "Access token required";
pub const MSG_TOKEN_INVALID: &str = "Invalid or expired token";
pub const MSG_USER_INACTIVE: &str = "User not found or inactive";
pub const MSG_ADMIN_PANEL_DENIED: &str =
    "Admin panel access denied. Ultimate template purchase required.";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub fn validate_plan(plan: &str) -> Result<(), CoreError> {
    if VALID_PLANS.contains(&plan) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid template plan '{plan}'. Must be one of: {VALID_PLANS:?}"
        )))
    }
}

pub fn validate_order_status(status: &str) -> Result<(), CoreError> {
    if VALID_ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid order status '{status}'. Must be one of: {VALID_ORDER_STATUSES:?}"
        )))
    }
}

/// Whether an order of this plan and status entitles its buyer to an admin panel.
pub fn order_includes_admin_panel(status: &str, plan: &str) -> bool {
    status == ORDER_COMPLETED && plan == PLAN_ULTIMATE
}

/// Whether a stored grant, together with its backing order, authorizes access.
pub fn grant_authorizes(grant_active: bool, order_status: &str, order_plan: &str) -> bool {
    grant_active && order_includes_admin_panel(order_status, order_plan)
}
