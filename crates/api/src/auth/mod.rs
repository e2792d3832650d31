//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`tokens`] -- Single-use opaque tokens for email verification and password reset.

pub mod jwt;
pub mod password;
pub mod tokens;
