//! Game record models and DTOs.
//!
//! [`Game`] mirrors a row of the backend `games` table. [`PublicGame`] is the
//! projection served to anonymous visitors (no contact email). [`NewGame`] is
//! the insert payload; it can only be built in the `pending` status.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::status::GameStatus;
use crate::types::{RecordId, Timestamp};

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A row from the `games` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub thumbnail_url: Option<String>,
    pub game_url: String,
    #[serde(default)]
    pub developer_email: Option<String>,
    pub status: GameStatus,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// PublicGame
// ---------------------------------------------------------------------------

/// Catalog and play-view projection of a [`Game`].
#[derive(Debug, Clone, Serialize)]
pub struct PublicGame {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub thumbnail_url: Option<String>,
    pub game_url: String,
    pub created_at: Timestamp,
}

impl From<Game> for PublicGame {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            title: game.title,
            description: game.description,
            category: game.category,
            thumbnail_url: game.thumbnail_url,
            game_url: game.game_url,
            created_at: game.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// NewGame
// ---------------------------------------------------------------------------

/// Insert payload for a new listing. Identifier and creation time are
/// assigned by the backend.
#[derive(Debug, Clone, Serialize)]
pub struct NewGame {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub game_url: String,
    pub developer_email: String,
    pub thumbnail_url: String,
    status: GameStatus,
}

impl NewGame {
    /// Build a submission awaiting review.
    pub fn pending(
        title: String,
        description: String,
        category: Category,
        game_url: String,
        developer_email: String,
        thumbnail_url: String,
    ) -> Self {
        Self {
            title,
            description,
            category,
            game_url,
            developer_email,
            thumbnail_url,
            status: GameStatus::Pending,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}
