//! Local state of the admin review dashboard.
//!
//! The board holds every record (any status), newest first. A reviewer's
//! decision is applied here before the backend confirms it; if the backend
//! update fails the caller replaces the board with a fresh read
//! ([`ReviewBoard::resync`]). [`ReviewBoard::revert`] exists only for the
//! case where that fresh read fails too.

use crate::catalog::newest_first;
use crate::error::CoreError;
use crate::game::Game;
use crate::status::{GameStatus, ReviewDecision};
use crate::types::RecordId;

/// A decision applied locally but not yet confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tentative {
    pub id: RecordId,
    pub previous: GameStatus,
    pub next: GameStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    games: Vec<Game>,
}

impl ReviewBoard {
    pub fn new(mut games: Vec<Game>) -> Self {
        newest_first(&mut games);
        Self { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn get(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Apply `decision` to the record locally.
    pub fn apply(&mut self, id: &str, decision: ReviewDecision) -> Result<Tentative, CoreError> {
        let game = self
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Game",
                id: id.to_string(),
            })?;

        let tentative = Tentative {
            id: game.id.clone(),
            previous: game.status,
            next: decision.target(),
        };
        game.status = tentative.next;
        Ok(tentative)
    }

    /// Replace local state with the backend's records.
    pub fn resync(&mut self, games: Vec<Game>) {
        *self = Self::new(games);
    }

    /// Undo `tentative` unless something else has changed the record since.
    pub fn revert(&mut self, tentative: &Tentative) {
        if let Some(game) = self.games.iter_mut().find(|g| g.id == tentative.id) {
            if game.status == tentative.next {
                game.status = tentative.previous;
            }
        }
    }
}
