//! Handler for developer game submissions.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use playora_core::game::{NewGame, PublicGame};
use playora_core::submission::{
    require_thumbnail, thumbnail_object_name, validate_thumbnail, SubmissionForm, Thumbnail,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Message shown for any backend failure while storing a submission.
const SUBMIT_FAILED: &str = "Something went wrong. Please try again.";

/// Content type recorded when the client did not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Keep the 413 that a body over the upload cap produces; anything else is
/// a malformed request.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Read the multipart body into the text form and the optional thumbnail.
///
/// Unknown parts, including any client-supplied `status`, are ignored.
async fn read_submission(
    mut multipart: Multipart,
) -> AppResult<(SubmissionForm, Option<Thumbnail>)> {
    let mut form = SubmissionForm::default();
    let mut thumbnail: Option<Thumbnail> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "thumbnail" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(multipart_error)?;
            thumbnail = Some(Thumbnail {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let slot = match name.as_str() {
            "title" => &mut form.title,
            "description" => &mut form.description,
            "category" => &mut form.category,
            "gameUrl" | "game_url" => &mut form.game_url,
            "developerEmail" | "developer_email" => &mut form.developer_email,
            other => {
                tracing::debug!(field = other, "Ignoring submission field");
                continue;
            }
        };
        let text = field
            .text()
            .await
            .map_err(multipart_error)?;
        *slot = text.trim().to_string();
    }

    Ok((form, thumbnail))
}

/// POST /api/v1/games
///
/// Accept a multipart submission, store the thumbnail, and create a
/// `pending` listing. The image is checked first; nothing is written to the
/// backend unless every field is valid.
pub async fn submit_game(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PublicGame>>)> {
    let (form, thumbnail) = read_submission(multipart).await?;

    let thumbnail = require_thumbnail(thumbnail)?;
    validate_thumbnail(&thumbnail)?;
    let category = form.validate_fields()?;

    let object_name = thumbnail_object_name(&thumbnail.file_name);
    let content_type = thumbnail
        .content_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    state
        .backend
        .storage
        .upload(&object_name, &content_type, thumbnail.bytes)
        .await
        .map_err(AppError::backend(SUBMIT_FAILED))?;
    let thumbnail_url = state.backend.storage.public_url(&object_name);

    let new_game = NewGame::pending(
        form.title,
        form.description,
        category,
        form.game_url,
        form.developer_email,
        thumbnail_url,
    );
    let game = state
        .backend
        .records
        .insert(&new_game)
        .await
        .map_err(|e| {
            tracing::warn!(object = %object_name, "Thumbnail stored but listing insert failed");
            AppError::backend(SUBMIT_FAILED)(e)
        })?;

    tracing::info!(
        game_id = %game.id,
        category = %game.category,
        "Game submitted for review"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PublicGame::from(game),
        }),
    ))
}
