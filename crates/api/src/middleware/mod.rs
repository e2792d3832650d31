//! Request extractors for authentication, authorization and rate limiting.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequirePlatformAdmin`] -- Requires the platform `admin` role.
//! - [`entitlement::AdminPanelAccess`] -- Requires admin-panel access to the
//!   template named in the path.
//! - [`rate_limit::AuthRateLimit`] / [`rate_limit::EmailRateLimit`] -- Per-client token buckets.

pub mod auth;
pub mod entitlement;
pub mod rate_limit;
pub mod rbac;
