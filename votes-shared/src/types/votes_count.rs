use serde::{Deserialize, Serialize};

use crate::types::{VotableRef, Vote, VoteItem};

/// Represents the aggregated vote counts of a votable.
///
/// Counts are computed at read time and are zero when no vote exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotesCount {
    pub votable: VotableRef,
    pub total_votes: i64,
    pub total_up_votes: i64,
    pub total_down_votes: i64,
}

impl VotesCount {
    /// Counts for a votable without any vote.
    pub fn empty(votable: VotableRef) -> Self {
        Self {
            votable,
            total_votes: 0,
            total_up_votes: 0,
            total_down_votes: 0,
        }
    }

    /// Tallies the votes that target `votable`, ignoring any other vote.
    pub fn tally<'a>(votable: VotableRef, votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        let mut count = Self::empty(votable);
        for vote in votes.into_iter().filter(|v| v.votable == count.votable) {
            count.total_votes += 1;
            match vote.vote_type {
                VoteItem::Up => count.total_up_votes += 1,
                VoteItem::Down => count.total_down_votes += 1,
            }
        }
        count
    }
}
