//! This module defines and re-exports the interfaces for the votes repository.
mod votes;

pub use votes::VotesRepository;
