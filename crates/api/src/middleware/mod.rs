//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in reviewer from a Bearer token.

pub mod auth;
