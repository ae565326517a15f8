//! # Votes Repository
//! This crate provides the storage collaborator of the vote engine. It
//! includes the `VotesRepository` interface, its error type and
//! configuration, a PostgreSQL implementation with the query-building scopes
//! used to avoid N+1 aggregation, and an in-memory implementation that
//! counts round-trips for tests.
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use config::VotesConfig;
pub use errors::VotesRepositoryError;
pub use interfaces::VotesRepository;
pub use memory::MemoryVotesRepository;
pub use postgres::{PostgresVotesRepository, VoteScopes};
