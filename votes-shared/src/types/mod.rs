mod vote;
mod vote_event;
mod vote_filter;
mod vote_item;
mod vote_status;
mod votable;
mod votes_count;

pub use vote::{NewVote, Vote, VoteReplacement, VoterPivot};
pub use vote_event::VoteEvent;
pub use vote_filter::VoteFilter;
pub use vote_item::{InvalidVoteType, VoteItem};
pub use vote_status::VoteStatus;
pub use votable::VotableRef;
pub use votes_count::VotesCount;

/// Identity of a persisted vote row, assigned by the store.
pub type VoteId = i64;

/// Identity of the entity casting votes.
pub type VoterId = i64;

/// Identity of a votable entity within its type.
pub type VotableId = i64;
