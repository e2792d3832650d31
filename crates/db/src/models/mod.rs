//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize`/plain create DTOs for inserts
//! - Response projections where the row holds secrets

pub mod activity_log;
pub mod admin_panel;
pub mod image;
pub mod order;
pub mod rsvp;
pub mod template;
pub mod translation;
pub mod user;
