//! Session-token primitives.
//!
//! - [`jwt`] -- local verification of backend-issued access tokens.

pub mod jwt;
