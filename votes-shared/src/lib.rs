//! # Votes Shared
//! This crate defines the data structures shared across the votes workspace.
//! It includes vote directions, vote records, polymorphic votable references,
//! aggregated vote counts, query filters and the events emitted on every
//! vote transition.
pub mod types;
