//! Error types for the votes repository.
//! Defines specific errors that can occur during storage operations on votes.
use thiserror::Error;
use votes_shared::types::{InvalidVoteType, VotableRef, VoterId};

/// Represents errors that can occur within the votes repository.
///
/// Storage failures are surfaced unchanged; the repository never retries.
#[derive(Debug, Error)]
pub enum VotesRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Voter {voter_id} already has a vote on {votable}")]
    DuplicateVote { voter_id: VoterId, votable: VotableRef },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    InvalidVoteType(#[from] InvalidVoteType),
}
