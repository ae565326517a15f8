//! Vote lifecycle notifications.
//!
//! The engine hands every `VoteEvent` to a `VoteEventSink` once the store
//! call that produced it has returned. Dispatch is fire-and-forget: a sink
//! cannot fail the mutation that triggered it.
mod broadcast;

pub use broadcast::BroadcastEventSink;

use votes_shared::types::VoteEvent;

/// Receiver of committed vote events.
pub trait VoteEventSink: Send + Sync {
    fn dispatch(&self, event: VoteEvent);
}
