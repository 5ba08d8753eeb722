//! Handlers for the `/admin` review dashboard.
//!
//! Both endpoints require a session and act through a [`ReviewDesk`] holding
//! the reviewer's token. The list opens the desk directly, so the session
//! check and the read run together; the status update verifies first with
//! [`AuthUser`].

use axum::extract::{Path, State};
use axum::Json;
use playora_backend::review::{DeskOpen, ReviewDesk, TransitionOutcome};
use playora_backend::BackendError;
use playora_core::error::CoreError;
use playora_core::game::Game;
use playora_core::status::ReviewDecision;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{invalid_session, AuthUser, BearerToken};
use crate::response::DataResponse;
use crate::state::AppState;

const UPDATE_FAILED: &str = "Failed to update game status";

/// Request body for `PUT /admin/games/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/v1/admin/games
///
/// Every game regardless of status, newest first.
pub async fn list_games(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Game>>>> {
    let opened = ReviewDesk::open(&state.backend, Some(&token))
        .await
        .map_err(AppError::backend("Failed to load games"))?;

    let desk = match opened {
        DeskOpen::Ready(desk) => desk,
        DeskOpen::RedirectToLogin => return Err(invalid_session()),
    };

    if let Some(reviewer) = desk.reviewer() {
        tracing::debug!(reviewer = %reviewer.id, count = desk.games().len(), "Review board opened");
    }

    Ok(Json(DataResponse {
        data: desk.into_games(),
    }))
}

/// PUT /api/v1/admin/games/{id}/status
///
/// Approve or reject a game. `pending` is not a valid target.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Game>>> {
    let decision = ReviewDecision::parse(&input.status)?;

    let mut desk = ReviewDesk::load(state.backend.records.clone(), &auth.access_token)
        .await
        .map_err(AppError::backend(UPDATE_FAILED))?;

    let outcome = desk.transition(&id, decision).await?;

    match outcome {
        TransitionOutcome::Committed(game) => {
            tracing::info!(
                game_id = %game.id,
                status = %game.status,
                reviewer = %auth.user_id,
                "Review decision recorded"
            );
            Ok(Json(DataResponse { data: game }))
        }
        TransitionOutcome::RolledBack {
            error: BackendError::NotFound,
        } => Err(AppError::Core(CoreError::NotFound { entity: "Game", id })),
        TransitionOutcome::RolledBack { error } => Err(AppError::Backend {
            context: UPDATE_FAILED,
            source: error,
        }),
    }
}
