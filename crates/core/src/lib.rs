//! Domain logic for the wedding-site platform.
//!
//! Everything here is free of I/O: config merging, the template theme
//! registry, resolution of public payloads, RSVP validation, entitlement
//! rules and the supporting validators.

pub mod config_merge;
pub mod email_template;
pub mod entitlement;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod roles;
pub mod rsvp;
pub mod slug;
pub mod template_config;
pub mod translations;
pub mod types;
pub mod upload;
