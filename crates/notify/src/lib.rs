//! Outbound email for RSVP notifications and account lifecycle messages.

pub mod email;

pub use email::{EmailConfig, EmailDelivery, EmailError};
