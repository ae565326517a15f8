//! Error types for the votes application.
//! Consolidates the errors that can occur while wiring and starting the
//! vote store.
#[derive(Debug, thiserror::Error)]
pub enum VotesError {
    #[error("Environment variable {0} must be set")]
    MissingEnv(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] votes_repository::VotesRepositoryError),
}
