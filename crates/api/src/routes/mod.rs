pub mod admin;
pub mod auth;
pub mod games;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      category directory
///
/// /games                                           list (public), submit (multipart)
/// /games/{id}                                      play view (approved only)
///
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/session                                    current session (requires auth)
///
/// /admin/games                                     all games, any status (requires auth)
/// /admin/games/{id}/status                         approve / reject (requires auth)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        // Public category directory.
        .route("/categories", get(handlers::catalog::list_categories))
        // Public catalog and submissions.
        .nest("/games", games::router(config.max_upload_bytes))
        // Authentication routes (login, logout, session).
        .nest("/auth", auth::router())
        // Review dashboard.
        .nest("/admin", admin::router())
}
