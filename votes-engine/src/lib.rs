//! # Votes Engine
//! This crate holds the vote-state engine: the `Voter` and `Votable`
//! capabilities implemented by callers' entities, the `VoteEngine` applying
//! cast, switch, cancel and toggle transitions through a `VotesRepository`,
//! the read side answering point and aggregate queries without N+1 lookups,
//! and the event sinks notified after each committed change.
pub mod capabilities;
pub mod engine;
pub mod errors;
pub mod events;

pub use capabilities::{HasVoteStatus, HasVotesCount, Votable, VoteRelation, Voter};
pub use engine::{Toggled, VoteEngine};
pub use errors::EngineError;
pub use events::{BroadcastEventSink, VoteEventSink};
