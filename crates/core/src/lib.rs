//! Playora domain layer.
//!
//! Pure types and rules shared by the backend client and the HTTP service:
//! the game record, its category and review status, the public catalog
//! filter, submission validation, and the admin review board. Nothing in
//! this crate performs I/O.

pub mod catalog;
pub mod category;
pub mod error;
pub mod game;
pub mod review;
pub mod status;
pub mod submission;
pub mod types;
