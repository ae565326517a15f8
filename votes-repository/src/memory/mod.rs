//! In-memory votes repository for testing and local development.
//!
//! `MemoryVotesRepository` keeps the votes table in a vector and counts
//! every round-trip it serves, so tests can assert how many storage queries
//! an operation issued. It enforces the same one-vote-per-pair rule as the
//! PostgreSQL schema.
//!
//! # Example
//!
//! ```ignore
//! let repository = Arc::new(MemoryVotesRepository::new());
//! let engine = VoteEngine::new(repository.clone(), Arc::new(BroadcastEventSink::default()));
//!
//! repository.reset_query_count();
//! engine.attach_vote_status_to_votables(&user, &mut posts).await?;
//! assert_eq!(repository.query_count(), 1);
//! ```

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use votes_shared::types::{
    NewVote, VotableRef, Vote, VoteFilter, VoteId, VoteReplacement, VoterId, VotesCount,
};

use crate::{VotesRepository, VotesRepositoryError};

#[derive(Default)]
struct MemoryTable {
    last_id: VoteId,
    votes: Vec<Vote>,
}

impl MemoryTable {
    fn position(&self, voter_id: VoterId, votable: &VotableRef) -> Option<usize> {
        self.votes.iter().position(|vote| vote.links(voter_id, votable))
    }

    fn insert(&mut self, vote: &NewVote) -> Result<Vote, VotesRepositoryError> {
        if self.position(vote.voter_id, &vote.votable).is_some() {
            return Err(VotesRepositoryError::DuplicateVote {
                voter_id: vote.voter_id,
                votable: vote.votable.clone(),
            });
        }

        self.last_id += 1;
        let created = Vote {
            id: self.last_id,
            voter_id: vote.voter_id,
            votable: vote.votable.clone(),
            vote_type: vote.vote_type,
            created_at: OffsetDateTime::now_utc(),
        };
        self.votes.push(created.clone());
        Ok(created)
    }

    fn delete(&mut self, voter_id: VoterId, votable: &VotableRef) -> Option<Vote> {
        self.position(voter_id, votable)
            .map(|index| self.votes.remove(index))
    }
}

/// Votes repository backed by process memory.
///
/// Rows keep insertion order, which is also id order.
#[derive(Default)]
pub struct MemoryVotesRepository {
    table: RwLock<MemoryTable>,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryVotesRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of round-trips served since creation or the last reset.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn reset_query_count(&self) {
        self.queries.store(0, Ordering::SeqCst);
    }

    /// Simulates a lost connection: while set, every call fails with
    /// `sqlx::Error::PoolTimedOut` and leaves the table untouched.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored vote, outside of the query count.
    pub fn all_votes(&self) -> Vec<Vote> {
        self.read_table().votes.clone()
    }

    fn begin_query(&self) -> Result<(), VotesRepositoryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VotesRepositoryError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, MemoryTable> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, MemoryTable> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn select(&self, filter: &VoteFilter) -> Vec<Vote> {
        self.read_table()
            .votes
            .iter()
            .filter(|vote| filter.matches(vote))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VotesRepository for MemoryVotesRepository {
    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VotesRepositoryError> {
        self.begin_query()?;
        self.write_table().insert(vote)
    }

    /// Holds the write lock across delete and insert, which gives the same
    /// all-or-nothing outcome as the PostgreSQL transaction.
    async fn replace_vote(&self, vote: &NewVote) -> Result<VoteReplacement, VotesRepositoryError> {
        self.begin_query()?;
        let mut table = self.write_table();
        let removed = table.delete(vote.voter_id, &vote.votable);
        let created = table.insert(vote)?;
        Ok(VoteReplacement { removed, created })
    }

    async fn delete_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        self.begin_query()?;
        Ok(self.write_table().delete(voter_id, votable))
    }

    async fn find_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        self.begin_query()?;
        let table = self.read_table();
        Ok(table
            .position(voter_id, votable)
            .map(|index| table.votes[index].clone()))
    }

    async fn find_votes(&self, filter: &VoteFilter) -> Result<Vec<Vote>, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(Vec::new());
        }
        self.begin_query()?;
        Ok(self.select(filter))
    }

    async fn count_votes(&self, filter: &VoteFilter) -> Result<i64, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(0);
        }
        self.begin_query()?;
        Ok(self.select(filter).len() as i64)
    }

    async fn exists(&self, filter: &VoteFilter) -> Result<bool, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(false);
        }
        self.begin_query()?;
        Ok(self.read_table().votes.iter().any(|vote| filter.matches(vote)))
    }

    async fn votes_counts(
        &self,
        votables: &[VotableRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError> {
        let mut distinct: Vec<VotableRef> = Vec::with_capacity(votables.len());
        for votable in votables {
            if !distinct.contains(votable) {
                distinct.push(votable.clone());
            }
        }
        if distinct.is_empty() {
            return Ok(Vec::new());
        }

        self.begin_query()?;
        let table = self.read_table();
        Ok(distinct
            .into_iter()
            .map(|votable| VotesCount::tally(votable, &table.votes))
            .collect())
    }

    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError> {
        self.begin_query()?;
        Ok(true)
    }
}
