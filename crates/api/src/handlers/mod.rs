pub mod activity;
pub mod auth;
pub mod health;
pub mod images;
pub mod maintenance;
pub mod orders;
pub mod rsvp;
pub mod templates;
pub mod translations;
