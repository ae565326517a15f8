//! Capabilities implemented by the caller's entities.
//!
//! An entity becomes a voter by implementing `Voter` and a votable by
//! implementing `Votable`. Both may expose a `VoteRelation` holding eagerly
//! loaded votes; the engine answers from it without touching storage.
mod relation;

pub use relation::VoteRelation;

use votes_shared::types::{VotableId, VotableRef, VoteStatus, VoterId, VotesCount};

/// An entity that casts votes.
pub trait Voter {
    fn voter_id(&self) -> VoterId;

    /// Votes cast by this voter, when the entity keeps them.
    fn votes_relation(&self) -> Option<&VoteRelation> {
        None
    }
}

/// An entity that receives votes.
///
/// The type tag must be stable: it is what the votes table stores to tell
/// a post from a book with the same id.
pub trait Votable {
    fn votable_type(&self) -> &str;

    fn votable_id(&self) -> VotableId;

    /// Votes received by this votable, when the entity keeps them.
    fn voters_relation(&self) -> Option<&VoteRelation> {
        None
    }

    fn votable_ref(&self) -> VotableRef {
        VotableRef::new(self.votable_type(), self.votable_id())
    }
}

/// A votable able to carry the vote status of one voter.
pub trait HasVoteStatus {
    fn set_vote_status(&mut self, status: VoteStatus);
}

/// A votable able to carry its aggregated counts.
pub trait HasVotesCount {
    fn set_votes_count(&mut self, count: VotesCount);
}
