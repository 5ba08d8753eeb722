//! Public catalog filter.
//!
//! A [`CatalogQuery`] captures the visitor's category and search inputs. The
//! backend client renders it as a remote filter; [`CatalogQuery::matches`]
//! evaluates the same rules locally so results can be re-checked after they
//! come back.
//!
//! Rules:
//! - only `approved` records are ever listed;
//! - a category token other than `"all"` keeps records whose category equals
//!   it, ignoring case;
//! - a search text keeps records whose title contains it, ignoring case;
//! - results are ordered newest first, with no limit.

use crate::category::CATEGORY_ALL;
use crate::game::Game;
use crate::status::GameStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    category: Option<String>,
    text: Option<String>,
}

impl CatalogQuery {
    /// Build a query from raw inputs. Blank inputs and the `"all"` sentinel
    /// mean "no filter". Both inputs are trimmed and lower-cased.
    pub fn new(category: Option<&str>, text: Option<&str>) -> Self {
        let category = normalize(category).filter(|c| c != CATEGORY_ALL);
        let text = normalize(text);
        Self { category, text }
    }

    /// Status every listed record must have.
    pub fn status(&self) -> GameStatus {
        GameStatus::Approved
    }

    /// Lower-cased category token, if filtering by category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Lower-cased search text, if filtering by title.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether `game` satisfies every rule of this query.
    pub fn matches(&self, game: &Game) -> bool {
        if game.status != self.status() {
            return false;
        }
        if let Some(category) = self.category() {
            if game.category.as_str() != category {
                return false;
            }
        }
        if let Some(text) = self.text() {
            if !game.title.to_lowercase().contains(text) {
                return false;
            }
        }
        true
    }

    /// Keep only matching records and order them newest first.
    pub fn apply(&self, games: Vec<Game>) -> Vec<Game> {
        let mut kept: Vec<Game> = games.into_iter().filter(|g| self.matches(g)).collect();
        newest_first(&mut kept);
        kept
    }
}

/// Order records by creation time, newest first.
pub fn newest_first(games: &mut [Game]) {
    games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
