//! This module defines the `VotesRepository` trait, the storage collaborator
//! of the vote engine. It abstracts the operations the engine needs over the
//! votes table: insert, transactional replace, delete, lookups and
//! aggregation.
use votes_shared::types::{NewVote, VotableRef, Vote, VoteFilter, VoteReplacement, VoterId, VotesCount};

use crate::errors::VotesRepositoryError;

/// A trait that defines the interface for interacting with the votes table.
///
/// Every method is a single logical round-trip to the store. Implementations
/// are responsible for keeping at most one row per (voter, votable) pair,
/// either through a unique constraint or by serializing `replace_vote`.
#[async_trait::async_trait]
pub trait VotesRepository: Send + Sync {
    /// Inserts a vote for a pair that has no vote yet.
    ///
    /// # Arguments
    ///
    /// * `vote` - The vote to store
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The stored vote with its assigned id and timestamp
    /// * `Err(VotesRepositoryError::DuplicateVote)` - The pair already has a vote
    /// * `Err(VotesRepositoryError)` - Any other storage failure
    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VotesRepositoryError>;

    /// Removes the active vote of the pair, if any, and inserts `vote`, atomically.
    ///
    /// The inserted row always gets a new id, even when the direction is unchanged.
    ///
    /// # Arguments
    ///
    /// * `vote` - The vote replacing whatever the pair held
    ///
    /// # Returns
    ///
    /// * `Ok(VoteReplacement)` - The removed vote (if any) and the created one
    /// * `Err(VotesRepositoryError)` - Storage failure, nothing was changed
    async fn replace_vote(&self, vote: &NewVote) -> Result<VoteReplacement, VotesRepositoryError>;

    /// Deletes the active vote of a voter on a votable.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vote))` - The deleted vote
    /// * `Ok(None)` - There was nothing to delete
    /// * `Err(VotesRepositoryError)` - Storage failure
    async fn delete_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError>;

    /// Finds the active vote of a voter on a votable.
    async fn find_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError>;

    /// Lists the votes matching `filter`, in creation (id) order.
    ///
    /// # Arguments
    ///
    /// * `filter` - Criteria; an empty `votables` list selects nothing
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Vote>)` - Matching votes (empty if none found)
    /// * `Err(VotesRepositoryError)` - Database query failure
    async fn find_votes(&self, filter: &VoteFilter) -> Result<Vec<Vote>, VotesRepositoryError>;

    /// Counts the votes matching `filter`. Zero when nothing matches.
    async fn count_votes(&self, filter: &VoteFilter) -> Result<i64, VotesRepositoryError>;

    /// Returns true if at least one vote matches `filter`.
    async fn exists(&self, filter: &VoteFilter) -> Result<bool, VotesRepositoryError>;

    /// Computes total, up and down counts for every votable of a batch.
    ///
    /// The whole batch is served by a single round-trip. Duplicate references
    /// are collapsed; every distinct input gets an entry, zeroed when it has no
    /// votes, in first-seen order.
    ///
    /// # Arguments
    ///
    /// * `votables` - The votables to aggregate
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<VotesCount>)` - One entry per distinct votable
    /// * `Err(VotesRepositoryError)` - Database query failure
    async fn votes_counts(
        &self,
        votables: &[VotableRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError>;

    /// Checks that the votes table exists in the store.
    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError>;
}
