//! The vote-state engine.
//!
//! `VoteEngine` owns no state of its own: every write goes through
//! `VotesRepository::replace_vote` or `VotesRepository::delete_vote`, which
//! keep at most one vote per (voter, votable) pair, and every read is
//! answered either from a loaded `VoteRelation` or with a single storage
//! round-trip. The voter-side operations live in `voter.rs`, the
//! votable-side ones in `votable.rs`.
mod votable;
mod voter;

use std::sync::Arc;

use tracing::debug;
use votes_repository::VotesRepository;
use votes_shared::types::{Vote, VoteEvent, VoteFilter, VoteItem};

use crate::capabilities::{Votable, VoteRelation, Voter};
use crate::errors::EngineError;
use crate::events::VoteEventSink;

/// Outcome of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    /// A vote in the toggled direction now exists.
    Voted(Vote),
    /// The vote in the toggled direction was removed.
    Cancelled,
}

/// Applies vote transitions and answers vote queries.
///
/// Cheap to clone; clones share the repository and the event sink.
#[derive(Clone)]
pub struct VoteEngine {
    repository: Arc<dyn VotesRepository>,
    events: Arc<dyn VoteEventSink>,
}

impl VoteEngine {
    /// Creates a new `VoteEngine`.
    ///
    /// # Arguments
    ///
    /// * `repository` - Storage of the votes table
    /// * `events` - Sink notified after every committed change
    ///
    /// # Returns
    ///
    /// A new `VoteEngine` instance.
    pub fn new(repository: Arc<dyn VotesRepository>, events: Arc<dyn VoteEventSink>) -> Self {
        Self { repository, events }
    }

    /// Returns true if `voter` has a vote on `votable`, in `vote_type`'s
    /// direction when given.
    ///
    /// Answered from the voter's votes or, failing that, the votable's
    /// voters when either relation is loaded.
    async fn vote_exists<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
        vote_type: Option<VoteItem>,
    ) -> Result<bool, EngineError> {
        let filter = VoteFilter::for_voter(voter.voter_id())
            .on(votable.votable_ref())
            .with_optional_vote_type(vote_type);

        let loaded = voter
            .votes_relation()
            .and_then(|relation| relation.with_loaded(|votes| votes.iter().any(|v| filter.matches(v))))
            .or_else(|| {
                votable
                    .voters_relation()
                    .and_then(|relation| relation.with_loaded(|votes| votes.iter().any(|v| filter.matches(v))))
            });
        if let Some(found) = loaded {
            debug!(found, "Vote lookup answered from loaded relation");
            return Ok(found);
        }

        Ok(self.repository.exists(&filter).await?)
    }

    /// Votes matching `filter`, from `relation` when loaded.
    async fn select_votes(
        &self,
        relation: Option<&VoteRelation>,
        filter: &VoteFilter,
    ) -> Result<Vec<Vote>, EngineError> {
        let loaded = relation.and_then(|relation| {
            relation.with_loaded(|votes| {
                votes
                    .iter()
                    .filter(|v| filter.matches(v))
                    .cloned()
                    .collect::<Vec<Vote>>()
            })
        });
        if let Some(votes) = loaded {
            debug!(count = votes.len(), "Votes selected from loaded relation");
            return Ok(votes);
        }

        Ok(self.repository.find_votes(filter).await?)
    }

    /// Number of votes matching `filter`, from `relation` when loaded.
    async fn count_matching(
        &self,
        relation: Option<&VoteRelation>,
        filter: &VoteFilter,
    ) -> Result<i64, EngineError> {
        let loaded = relation.and_then(|relation| {
            relation.with_loaded(|votes| votes.iter().filter(|v| filter.matches(v)).count())
        });
        if let Some(count) = loaded {
            return Ok(count as i64);
        }

        Ok(self.repository.count_votes(filter).await?)
    }

    fn dispatch(&self, event: VoteEvent) {
        self.events.dispatch(event);
    }
}

/// Unsets the loaded relations of both handles touched by a mutation.
fn invalidate<V: Voter, T: Votable>(voter: &V, votable: &T) {
    if let Some(relation) = voter.votes_relation() {
        relation.unset();
    }
    if let Some(relation) = votable.voters_relation() {
        relation.unset();
    }
}
