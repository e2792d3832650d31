//! Account role names stored in `management_users.role`.

/// Platform operator: may create/delete templates and record orders.
pub const ROLE_ADMIN: &str = "admin";

/// Regular customer account (couples who purchase a template).
pub const ROLE_CUSTOMER: &str = "customer";
