//! Votes Library
//!
//! This library wires the vote engine to its PostgreSQL store: environment
//! configuration, error handling, and dependency injection.

pub mod config;
pub mod errors;

pub use config::Dependencies;
pub use errors::VotesError;
