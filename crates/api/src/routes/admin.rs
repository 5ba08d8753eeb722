//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require a session (enforced by handler extractors).
///
/// ```text
/// GET /games               -> list_games
/// PUT /games/{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", get(admin::list_games))
        .route("/games/{id}/status", put(admin::update_status))
}
