//! Submission form validation and thumbnail naming.
//!
//! A submission carries five text fields and one image. The image is
//! required and checked first; the text fields are validated with
//! [`validator`] before anything is written to the backend.

use serde::Deserialize;
use validator::{Validate, ValidateUrl, ValidationError};

use crate::category::Category;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Message shown when the form arrives without an image.
pub const THUMBNAIL_REQUIRED_MESSAGE: &str = "Please upload a thumbnail.";

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: u64 = 120;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: u64 = 2000;

/// Raster formats accepted for thumbnails (sniffed from the file header).
const ACCEPTED_RASTER_FORMATS: &[image::ImageFormat] = &[
    image::ImageFormat::Png,
    image::ImageFormat::Jpeg,
    image::ImageFormat::Gif,
    image::ImageFormat::WebP,
];

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Text fields of the submission form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmissionForm {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,

    pub category: String,

    #[validate(custom(function = "validate_game_url"))]
    pub game_url: String,

    #[validate(email(message = "Contact email must be a valid email address"))]
    pub developer_email: String,
}

impl SubmissionForm {
    /// Validate every field and return the parsed category.
    pub fn validate_fields(&self) -> Result<Category, CoreError> {
        let mut messages: Vec<String> = Vec::new();

        if let Err(errors) = self.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (field, field_errors) in fields {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for '{field}'"));
                    messages.push(message);
                }
            }
        }

        let category = Category::parse(&self.category);
        if let Err(CoreError::Validation(msg)) = &category {
            messages.push(msg.clone());
        }

        if messages.is_empty() {
            category
        } else {
            Err(CoreError::Validation(messages.join("; ")))
        }
    }
}

/// The game must be an absolute `http`/`https` URL so it can be embedded.
fn validate_game_url(value: &str) -> Result<(), ValidationError> {
    let lowered = value.trim().to_ascii_lowercase();
    let http = lowered.starts_with("http://") || lowered.starts_with("https://");
    if http && value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("game_url")
            .with_message("Game URL must be an absolute http(s) URL".into()))
    }
}

// ---------------------------------------------------------------------------
// Thumbnail
// ---------------------------------------------------------------------------

/// An uploaded thumbnail as received from the client.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Reject a missing or zero-byte thumbnail.
pub fn require_thumbnail(thumbnail: Option<Thumbnail>) -> Result<Thumbnail, CoreError> {
    match thumbnail {
        Some(t) if !t.bytes.is_empty() => Ok(t),
        _ => Err(CoreError::Validation(THUMBNAIL_REQUIRED_MESSAGE.into())),
    }
}

/// Check that the thumbnail really is an image.
///
/// A declared content type must start with `image/`. The bytes must sniff as
/// one of the accepted raster formats. `.svg` files have no binary signature,
/// so they must open with an XML prolog or an `<svg` tag and carry no script.
pub fn validate_thumbnail(thumbnail: &Thumbnail) -> Result<(), CoreError> {
    if let Some(content_type) = &thumbnail.content_type {
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "Thumbnail must be an image, got '{content_type}'"
            )));
        }
    }

    if file_extension(&thumbnail.file_name).as_deref() == Some("svg") {
        return validate_svg(&thumbnail.bytes);
    }

    match image::guess_format(&thumbnail.bytes) {
        Ok(format) if ACCEPTED_RASTER_FORMATS.contains(&format) => Ok(()),
        _ => Err(CoreError::Validation(
            "Thumbnail must be an SVG, PNG, JPG, GIF or WebP image".into(),
        )),
    }
}

fn validate_svg(bytes: &[u8]) -> Result<(), CoreError> {
    let invalid = || CoreError::Validation("Thumbnail is not a valid SVG image".into());

    let text = std::str::from_utf8(bytes).map_err(|_| invalid())?;
    let body = text.trim_start_matches('\u{feff}').trim_start();
    if !(body.starts_with("<svg") || body.starts_with("<?xml")) {
        return Err(invalid());
    }

    let lowered = body.to_ascii_lowercase();
    let scripted = lowered.contains("<script")
        || lowered.contains("javascript:")
        || lowered.contains("<foreignobject")
        || has_event_handler(&lowered);
    if scripted {
        return Err(CoreError::Validation(
            "SVG thumbnails must not contain scripts".into(),
        ));
    }
    Ok(())
}

/// Whether lower-cased markup has an `on*=` attribute, e.g. `onload="..."`.
fn has_event_handler(markup: &str) -> bool {
    let bytes = markup.as_bytes();
    markup.match_indices("on").any(|(at, _)| {
        let starts_attribute =
            at > 0 && (bytes[at - 1].is_ascii_whitespace() || bytes[at - 1] == b'/');
        let rest = &markup[at + 2..];
        let name_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        starts_attribute && name_len > 0 && rest[name_len..].trim_start().starts_with('=')
    })
}

/// Lower-cased extension of `file_name`, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

/// Randomized object name for a stored thumbnail, keeping the original
/// extension.
pub fn thumbnail_object_name(original_file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match file_extension(original_file_name) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
