//! Review status of a listing and the reviewer decisions that move it.
//!
//! ```text
//! pending  -> approved | rejected
//! approved -> rejected
//! rejected -> approved
//! ```
//!
//! Every record starts as `pending`. Reviewers can only choose `approved` or
//! `rejected`, so a record never returns to `pending`; there is no terminal
//! state and no history is kept.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Review status of a game record. Only `Approved` records are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GameStatus {
    Pending,
    Approved,
    Rejected,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether records in this status may appear in public reads.
    pub fn is_public(self) -> bool {
        self == Self::Approved
    }

    /// Parse a stored status, ignoring case.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Unknown status '{value}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for GameStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// A reviewer's verdict on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Parse a decision. `pending` is not a decision.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{value}'. Must be one of: approved, rejected"
            ))),
        }
    }

    /// The status a record ends up in after this decision.
    pub fn target(self) -> GameStatus {
        match self {
            Self::Approved => GameStatus::Approved,
            Self::Rejected => GameStatus::Rejected,
        }
    }
}

impl From<ReviewDecision> for GameStatus {
    fn from(decision: ReviewDecision) -> Self {
        decision.target()
    }
}
