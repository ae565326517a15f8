use std::collections::HashMap;

use tracing::{debug, instrument};
use votes_shared::types::{VotableRef, Vote, VoteFilter, VoteItem, VoterPivot, VotesCount};

use crate::capabilities::{HasVotesCount, Votable, Voter};
use crate::engine::VoteEngine;
use crate::errors::EngineError;

impl VoteEngine {
    /// Every voter of `votable` with the direction of their vote, in vote
    /// order.
    pub async fn voters<T: Votable>(&self, votable: &T) -> Result<Vec<VoterPivot>, EngineError> {
        self.voters_with(votable, None).await
    }

    pub async fn up_voters<T: Votable>(&self, votable: &T) -> Result<Vec<VoterPivot>, EngineError> {
        self.voters_with(votable, Some(VoteItem::Up)).await
    }

    pub async fn down_voters<T: Votable>(&self, votable: &T) -> Result<Vec<VoterPivot>, EngineError> {
        self.voters_with(votable, Some(VoteItem::Down)).await
    }

    pub async fn is_voted_by<T: Votable, V: Voter>(
        &self,
        votable: &T,
        voter: &V,
        vote_type: Option<VoteItem>,
    ) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, vote_type).await
    }

    pub async fn is_up_voted_by<T: Votable, V: Voter>(&self, votable: &T, voter: &V) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, Some(VoteItem::Up)).await
    }

    pub async fn is_down_voted_by<T: Votable, V: Voter>(&self, votable: &T, voter: &V) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, Some(VoteItem::Down)).await
    }

    pub async fn total_votes<T: Votable>(&self, votable: &T) -> Result<i64, EngineError> {
        self.total_with(votable, None).await
    }

    pub async fn total_up_votes<T: Votable>(&self, votable: &T) -> Result<i64, EngineError> {
        self.total_with(votable, Some(VoteItem::Up)).await
    }

    pub async fn total_down_votes<T: Votable>(&self, votable: &T) -> Result<i64, EngineError> {
        self.total_with(votable, Some(VoteItem::Down)).await
    }

    /// Counts of every element of `votables`, in the same order.
    ///
    /// One storage round-trip for the whole batch. Elements repeated in the
    /// batch get the same counts; elements without votes get zeros.
    ///
    /// # Arguments
    ///
    /// * `votables` - The batch to count, possibly mixing votable types
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<VotesCount>)` - One entry per element of `votables`
    /// * `Err(EngineError)` - The store failed
    #[instrument(skip_all, fields(batch = votables.len()))]
    pub async fn votes_counts<T: Votable>(&self, votables: &[T]) -> Result<Vec<VotesCount>, EngineError> {
        let refs: Vec<VotableRef> = votables.iter().map(|votable| votable.votable_ref()).collect();
        let counts: HashMap<VotableRef, VotesCount> = self
            .repository
            .votes_counts(&refs)
            .await?
            .into_iter()
            .map(|count| (count.votable.clone(), count))
            .collect();

        Ok(refs
            .into_iter()
            .map(|votable| match counts.get(&votable) {
                Some(count) => count.clone(),
                None => VotesCount::empty(votable),
            })
            .collect())
    }

    /// Writes the counts of every element of `votables` onto it.
    pub async fn attach_votes_counts<T>(&self, votables: &mut [T]) -> Result<(), EngineError>
    where
        T: Votable + HasVotesCount,
    {
        let counts = self.votes_counts(votables).await?;
        for (votable, count) in votables.iter_mut().zip(counts) {
            votable.set_votes_count(count);
        }
        Ok(())
    }

    /// Fetches every vote received by `votable` and loads it into the
    /// votable's relation, when the votable keeps one.
    pub async fn load_voters<T: Votable>(&self, votable: &T) -> Result<Vec<Vote>, EngineError> {
        let votes = self
            .repository
            .find_votes(&VoteFilter::for_votable(votable.votable_ref()))
            .await?;
        if let Some(relation) = votable.voters_relation() {
            relation.set(votes.clone());
        }
        Ok(votes)
    }

    /// Loads the voters relation of every element of `votables` with a
    /// single storage round-trip.
    #[instrument(skip_all, fields(batch = votables.len()))]
    pub async fn load_voters_for<T: Votable>(&self, votables: &[T]) -> Result<(), EngineError> {
        if votables.is_empty() {
            return Ok(());
        }

        let refs: Vec<VotableRef> = votables.iter().map(|votable| votable.votable_ref()).collect();
        let votes = self
            .repository
            .find_votes(&VoteFilter::default().on_many(refs))
            .await?;

        let mut grouped: HashMap<VotableRef, Vec<Vote>> = HashMap::new();
        for vote in votes {
            grouped.entry(vote.votable.clone()).or_default().push(vote);
        }
        debug!(votables_with_votes = grouped.len(), "Voters loaded");

        for votable in votables {
            if let Some(relation) = votable.voters_relation() {
                let votes = grouped.get(&votable.votable_ref()).cloned().unwrap_or_default();
                relation.set(votes);
            }
        }
        Ok(())
    }

    async fn voters_with<T: Votable>(
        &self,
        votable: &T,
        vote_type: Option<VoteItem>,
    ) -> Result<Vec<VoterPivot>, EngineError> {
        let filter = VoteFilter::for_votable(votable.votable_ref()).with_optional_vote_type(vote_type);
        let votes = self.select_votes(votable.voters_relation(), &filter).await?;
        Ok(votes.iter().map(Vote::pivot).collect())
    }

    async fn total_with<T: Votable>(&self, votable: &T, vote_type: Option<VoteItem>) -> Result<i64, EngineError> {
        let filter = VoteFilter::for_votable(votable.votable_ref()).with_optional_vote_type(vote_type);
        self.count_matching(votable.voters_relation(), &filter).await
    }
}
