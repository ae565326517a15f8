use std::collections::HashMap;

use tracing::{debug, instrument};
use votes_shared::types::{
    NewVote, VotableId, VotableRef, Vote, VoteEvent, VoteFilter, VoteItem, VoteReplacement,
    VoteStatus,
};

use crate::capabilities::{HasVoteStatus, Votable, Voter};
use crate::engine::{Toggled, VoteEngine, invalidate};
use crate::errors::EngineError;

impl VoteEngine {
    /// Casts a vote of `voter` on `votable` in the given direction.
    pub async fn vote<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
        vote_type: VoteItem,
    ) -> Result<Vote, EngineError> {
        match vote_type {
            VoteItem::Up => self.up_vote(voter, votable).await,
            VoteItem::Down => self.down_vote(voter, votable).await,
        }
    }

    /// Up-votes `votable`, replacing whatever vote `voter` had on it.
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The freshly stored vote; its id differs from any previous one
    /// * `Err(EngineError)` - The store failed and nothing changed
    pub async fn up_vote<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<Vote, EngineError> {
        self.cast(voter, votable, VoteItem::Up).await
    }

    /// Down-votes `votable`, replacing whatever vote `voter` had on it.
    pub async fn down_vote<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<Vote, EngineError> {
        self.cast(voter, votable, VoteItem::Down).await
    }

    pub async fn has_voted<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
        vote_type: Option<VoteItem>,
    ) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, vote_type).await
    }

    pub async fn has_up_voted<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, Some(VoteItem::Up)).await
    }

    pub async fn has_down_voted<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<bool, EngineError> {
        self.vote_exists(voter, votable, Some(VoteItem::Down)).await
    }

    /// Removes the vote of `voter` on `votable`, if any.
    ///
    /// Cancelling a vote that does not exist succeeds without emitting an
    /// event, so the call is idempotent.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - No vote remains for the pair
    /// * `Err(EngineError)` - The store failed
    #[instrument(skip_all, fields(voter_id = voter.voter_id(), votable = %votable.votable_ref()))]
    pub async fn cancel_vote<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<bool, EngineError> {
        let removed = self
            .repository
            .delete_vote(voter.voter_id(), &votable.votable_ref())
            .await?;

        match removed {
            Some(vote) => {
                invalidate(voter, votable);
                debug!(vote_id = vote.id, "Vote cancelled");
                self.dispatch(VoteEvent::CancelVoted(vote));
            }
            None => debug!("No vote to cancel"),
        }
        Ok(true)
    }

    /// Cancels an existing up-vote, otherwise up-votes.
    pub async fn toggle_up_vote<V: Voter, T: Votable>(&self, voter: &V, votable: &T) -> Result<Toggled, EngineError> {
        self.toggle(voter, votable, VoteItem::Up).await
    }

    /// Cancels an existing down-vote, otherwise down-votes.
    pub async fn toggle_down_vote<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
    ) -> Result<Toggled, EngineError> {
        self.toggle(voter, votable, VoteItem::Down).await
    }

    /// Ids of the votables of `votable_type` that `voter` voted on, in vote
    /// order, optionally restricted to one direction.
    pub async fn voted_items<V: Voter>(
        &self,
        voter: &V,
        votable_type: &str,
        vote_type: Option<VoteItem>,
    ) -> Result<Vec<VotableId>, EngineError> {
        let filter = VoteFilter::for_voter(voter.voter_id())
            .with_votable_type(votable_type)
            .with_optional_vote_type(vote_type);
        let votes = self.select_votes(voter.votes_relation(), &filter).await?;
        Ok(votes.into_iter().map(|vote| vote.votable.votable_id).collect())
    }

    pub async fn up_voted_items<V: Voter>(&self, voter: &V, votable_type: &str) -> Result<Vec<VotableId>, EngineError> {
        self.voted_items(voter, votable_type, Some(VoteItem::Up)).await
    }

    pub async fn down_voted_items<V: Voter>(
        &self,
        voter: &V,
        votable_type: &str,
    ) -> Result<Vec<VotableId>, EngineError> {
        self.voted_items(voter, votable_type, Some(VoteItem::Down)).await
    }

    /// Vote status of `voter` on each element of `votables`, in order.
    ///
    /// Costs one storage round-trip for the whole batch, none when the batch
    /// is empty or the voter's votes are loaded. The batch may mix votable
    /// types.
    #[instrument(skip_all, fields(voter_id = voter.voter_id(), batch = votables.len()))]
    pub async fn vote_statuses<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votables: &[T],
    ) -> Result<Vec<VoteStatus>, EngineError> {
        if votables.is_empty() {
            return Ok(Vec::new());
        }

        let refs: Vec<VotableRef> = votables.iter().map(|votable| votable.votable_ref()).collect();
        let filter = VoteFilter::for_voter(voter.voter_id()).on_many(refs.clone());
        let votes = self.select_votes(voter.votes_relation(), &filter).await?;

        let directions: HashMap<VotableRef, VoteItem> = votes
            .into_iter()
            .map(|vote| (vote.votable, vote.vote_type))
            .collect();
        Ok(refs
            .iter()
            .map(|votable| VoteStatus::from(directions.get(votable).copied()))
            .collect())
    }

    /// Writes the vote status of `voter` onto every element of `votables`.
    ///
    /// Same cost as `vote_statuses`.
    pub async fn attach_vote_status_to_votables<V, T>(
        &self,
        voter: &V,
        votables: &mut [T],
    ) -> Result<(), EngineError>
    where
        V: Voter,
        T: Votable + HasVoteStatus,
    {
        let statuses = self.vote_statuses(voter, votables).await?;
        for (votable, status) in votables.iter_mut().zip(statuses) {
            votable.set_vote_status(status);
        }
        Ok(())
    }

    /// Counts the votes selected by `filter`.
    ///
    /// ```ignore
    /// let books_up = VoteFilter::for_voter(user.id)
    ///     .with_votable_type("books")
    ///     .with_vote_type(VoteItem::Up);
    /// let count = engine.count_votes(&books_up).await?;
    /// ```
    pub async fn count_votes(&self, filter: &VoteFilter) -> Result<i64, EngineError> {
        Ok(self.repository.count_votes(filter).await?)
    }

    /// Fetches every vote cast by `voter` and loads it into the voter's
    /// relation, when the voter keeps one.
    pub async fn load_votes<V: Voter>(&self, voter: &V) -> Result<Vec<Vote>, EngineError> {
        let votes = self
            .repository
            .find_votes(&VoteFilter::for_voter(voter.voter_id()))
            .await?;
        if let Some(relation) = voter.votes_relation() {
            relation.set(votes.clone());
        }
        Ok(votes)
    }

    #[instrument(skip_all, fields(voter_id = voter.voter_id(), votable = %votable.votable_ref(), %vote_type))]
    async fn cast<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
        vote_type: VoteItem,
    ) -> Result<Vote, EngineError> {
        let new_vote = NewVote::new(voter.voter_id(), votable.votable_ref(), vote_type);
        let VoteReplacement { removed, created } = self.repository.replace_vote(&new_vote).await?;
        invalidate(voter, votable);

        if let Some(removed) = removed {
            debug!(vote_id = removed.id, "Previous vote replaced");
            self.dispatch(VoteEvent::CancelVoted(removed));
        }
        debug!(vote_id = created.id, "Vote cast");
        self.dispatch(VoteEvent::Voted(created.clone()));
        Ok(created)
    }

    async fn toggle<V: Voter, T: Votable>(
        &self,
        voter: &V,
        votable: &T,
        vote_type: VoteItem,
    ) -> Result<Toggled, EngineError> {
        if self.vote_exists(voter, votable, Some(vote_type)).await? {
            self.cancel_vote(voter, votable).await?;
            Ok(Toggled::Cancelled)
        } else {
            self.cast(voter, votable, vote_type).await.map(Toggled::Voted)
        }
    }
}
