use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{VotableRef, VoteId, VoteItem, VoterId};

/// Represents a persisted vote of one voter on one votable.
///
/// A vote is a join entity: neither the voter nor the votable owns it. It is
/// created on cast and deleted on cancel or switch, never updated in place,
/// so switching direction always produces a new `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub voter_id: VoterId,
    pub votable: VotableRef,
    pub vote_type: VoteItem,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Vote {
    pub fn is_up(&self) -> bool {
        self.vote_type == VoteItem::Up
    }

    pub fn is_down(&self) -> bool {
        self.vote_type == VoteItem::Down
    }

    /// Returns true if this vote belongs to the given voter and votable.
    pub fn links(&self, voter_id: VoterId, votable: &VotableRef) -> bool {
        self.voter_id == voter_id && &self.votable == votable
    }

    /// Projects the vote onto the voter side of the relation.
    pub fn pivot(&self) -> VoterPivot {
        VoterPivot {
            voter_id: self.voter_id,
            vote_type: self.vote_type,
            voted_at: self.created_at,
        }
    }
}

/// A vote that has not been stored yet.
///
/// The voter is always explicit; resolving the current voter from a session
/// happens at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub voter_id: VoterId,
    pub votable: VotableRef,
    pub vote_type: VoteItem,
}

impl NewVote {
    pub fn new(voter_id: VoterId, votable: VotableRef, vote_type: VoteItem) -> Self {
        Self {
            voter_id,
            votable,
            vote_type,
        }
    }
}

/// Outcome of replacing the vote of a (voter, votable) pair.
///
/// `removed` is the vote that was deleted in the same transaction, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReplacement {
    pub removed: Option<Vote>,
    pub created: Vote,
}

/// A voter of a votable, annotated with the direction of their vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterPivot {
    pub voter_id: VoterId,
    pub vote_type: VoteItem,
    #[serde(with = "time::serde::rfc3339")]
    pub voted_at: OffsetDateTime,
}
