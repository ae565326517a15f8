//! PostgreSQL implementation of the votes repository.
//!
//! Provides a PostgreSQL backend for the `VotesRepository` trait with
//! connection pooling, transaction safety, and batch aggregation.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Switches run delete-then-insert inside one transaction
//! - Batch lookups and counts using PostgreSQL's `UNNEST`
//! - Correlated-subquery scopes for callers' own entity queries
//!
//! ## Database Tables
//!
//! - `votes` (configurable): one row per (voter, votable) pair
mod scopes;
mod statements;
mod votes_repository;

pub use scopes::VoteScopes;
pub use votes_repository::PostgresVotesRepository;
