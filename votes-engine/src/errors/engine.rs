//! Error types for the vote engine.
use thiserror::Error;
use votes_repository::VotesRepositoryError;

/// Represents errors that can occur while applying or reading vote state.
///
/// Storage failures are passed through unchanged; the engine never retries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Votes repository error: {0}")]
    Repository(#[from] VotesRepositoryError),
}
