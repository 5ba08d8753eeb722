//! Route definitions for the `/games` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catalog, submission};
use crate::state::AppState;

/// Routes mounted at `/games`.
///
/// Only the submission route accepts bodies up to `max_upload_bytes`.
///
/// ```text
/// GET  /       -> list_games (?category=&q=)
/// POST /       -> submit_game (multipart)
/// GET  /{id}   -> get_game
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_games).merge(
                post(submission::submit_game).layer(DefaultBodyLimit::max(max_upload_bytes)),
            ),
        )
        .route("/{id}", get(catalog::get_game))
}
