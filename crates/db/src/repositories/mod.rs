//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod admin_panel_repo;
pub mod image_repo;
pub mod order_repo;
pub mod rsvp_repo;
pub mod template_repo;
pub mod translation_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use admin_panel_repo::AdminPanelRepo;
pub use image_repo::TemplateImageRepo;
pub use order_repo::OrderRepo;
pub use rsvp_repo::RsvpRepo;
pub use template_repo::TemplateRepo;
pub use translation_repo::TranslationRepo;
pub use user_repo::UserRepo;
