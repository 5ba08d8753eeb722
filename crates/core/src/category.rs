//! Game categories and the catalog's category directory.
//!
//! Categories are stored as lower-case tokens (`"action"`, `"puzzle"`, ...)
//! but older rows and query strings may use any casing, so parsing is
//! case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Category token meaning "no category filter".
pub const CATEGORY_ALL: &str = "all";

/// Every category, in the order the filter bar and submission form show them.
pub const ALL_CATEGORIES: [Category; 7] = [
    Category::Action,
    Category::Puzzle,
    Category::Racing,
    Category::Arcade,
    Category::Adventure,
    Category::Sports,
    Category::Strategy,
];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The genre a game is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Action,
    Puzzle,
    Racing,
    Arcade,
    Adventure,
    Sports,
    Strategy,
}

impl Category {
    /// Stored token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Puzzle => "puzzle",
            Self::Racing => "racing",
            Self::Arcade => "arcade",
            Self::Adventure => "adventure",
            Self::Sports => "sports",
            Self::Strategy => "strategy",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Puzzle => "Puzzle",
            Self::Racing => "Racing",
            Self::Arcade => "Arcade",
            Self::Adventure => "Adventure",
            Self::Sports => "Sports",
            Self::Strategy => "Strategy",
        }
    }

    /// Parse a category token, ignoring case and surrounding whitespace.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let normalized = token.trim().to_ascii_lowercase();
        ALL_CATEGORIES
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown category '{token}'. Must be one of: {}",
                    ALL_CATEGORIES.map(Category::as_str).join(", ")
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Entry in the category directory served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub label: &'static str,
}

/// The full category directory.
pub fn category_directory() -> Vec<CategoryInfo> {
    ALL_CATEGORIES
        .into_iter()
        .map(|id| CategoryInfo {
            id,
            label: id.label(),
        })
        .collect()
}
