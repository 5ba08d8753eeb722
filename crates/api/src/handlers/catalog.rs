//! Handlers for the public catalog: category directory, listing, and the
//! per-game play view.

use axum::extract::{Path, Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::response::IntoResponse;
use axum::Json;
use playora_core::category::{category_directory, CategoryInfo};
use playora_core::error::CoreError;
use playora_core::game::PublicGame;

use crate::error::{AppError, AppResult};
use crate::query::CatalogParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// `Cache-Control` value for public reads.
fn public_cache(state: &AppState) -> [(axum::http::HeaderName, String); 1] {
    [(
        CACHE_CONTROL,
        format!("public, max-age={}", state.config.catalog_cache_secs),
    )]
}

/// GET /api/v1/categories
pub async fn list_categories() -> Json<DataResponse<Vec<CategoryInfo>>> {
    Json(DataResponse {
        data: category_directory(),
    })
}

/// GET /api/v1/games?category=&q=
///
/// Approved games matching the optional category and title search, newest
/// first. Results from the backend are re-checked against the same filter.
pub async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query();

    let games = state
        .backend
        .records
        .list_catalog(&query)
        .await
        .map_err(AppError::backend("Failed to load games"))?;

    let games: Vec<PublicGame> = query
        .apply(games)
        .into_iter()
        .map(PublicGame::from)
        .collect();

    tracing::debug!(
        category = ?query.category(),
        text = ?query.text(),
        count = games.len(),
        "Catalog listed"
    );

    Ok((public_cache(&state), Json(DataResponse { data: games })))
}

/// GET /api/v1/games/{id}
///
/// A single approved game. Pending and rejected records are reported as not
/// found.
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = state
        .backend
        .records
        .get(&id)
        .await
        .map_err(AppError::backend("Failed to load game"))?;

    let game = found
        .filter(|g| g.status.is_public())
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Game", id }))?;

    Ok((
        public_cache(&state),
        Json(DataResponse {
            data: PublicGame::from(game),
        }),
    ))
}
