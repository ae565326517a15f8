use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents the direction of a vote cast by a voter.
///
/// Only two directions exist. They are stored and compared through their
/// canonical tokens, `up_vote` and `down_vote`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VoteItem {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

/// Raised when a string is not one of the canonical vote tokens.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Invalid vote type: {0}")]
pub struct InvalidVoteType(pub String);

impl VoteItem {
    pub const UP: &'static str = "up_vote";
    pub const DOWN: &'static str = "down_vote";

    /// Returns the canonical token for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteItem::Up => Self::UP,
            VoteItem::Down => Self::DOWN,
        }
    }
}

impl FromStr for VoteItem {
    type Err = InvalidVoteType;

    /// Parses a canonical token. Matching is exact and case-sensitive.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            Self::UP => Ok(VoteItem::Up),
            Self::DOWN => Ok(VoteItem::Down),
            _ => Err(InvalidVoteType(raw.to_string())),
        }
    }
}

impl TryFrom<String> for VoteItem {
    type Error = InvalidVoteType;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<VoteItem> for String {
    fn from(item: VoteItem) -> Self {
        item.as_str().to_string()
    }
}

impl fmt::Display for VoteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
