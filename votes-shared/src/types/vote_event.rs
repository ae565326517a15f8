use serde::{Deserialize, Serialize};

use crate::types::Vote;

/// Represents a vote lifecycle notification.
///
/// Events are published after the change has been committed. Consumers such
/// as counters, audit logs or notifiers must not expect the emitting
/// operation to retry or roll back on their behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteEvent {
    /// A vote row was created.
    Voted(Vote),
    /// A vote row was deleted, by a cancel or by a switch of direction.
    CancelVoted(Vote),
}

impl VoteEvent {
    pub fn vote(&self) -> &Vote {
        match self {
            VoteEvent::Voted(vote) | VoteEvent::CancelVoted(vote) => vote,
        }
    }
}
