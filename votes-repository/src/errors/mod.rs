//! Error types for the votes repository.
//! Consolidates and re-exports error types related to votes storage operations.
mod votes;

pub use votes::VotesRepositoryError;
