use std::sync::RwLock;

use votes_shared::types::Vote;

/// Eagerly loaded votes of one side of the voting relationship.
///
/// A relation is either unloaded, in which case every question goes to
/// storage, or loaded with the complete set of votes of its owner, in
/// which case the engine answers from memory. Mutations made through the
/// engine unset the relations of both handles involved, so a loaded
/// relation never outlives the state it was loaded from within one handle.
///
/// The engine works on shared references, hence the interior mutability.
#[derive(Debug, Default)]
pub struct VoteRelation {
    votes: RwLock<Option<Vec<Vote>>>,
}

impl VoteRelation {
    /// Creates an unloaded relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a relation already loaded with `votes`.
    pub fn loaded(votes: Vec<Vote>) -> Self {
        Self {
            votes: RwLock::new(Some(votes)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.read().is_some()
    }

    /// Replaces the loaded votes.
    pub fn set(&self, votes: Vec<Vote>) {
        *self.write() = Some(votes);
    }

    /// Drops the loaded votes; the next read goes to storage.
    pub fn unset(&self) {
        *self.write() = None;
    }

    /// Copy of the loaded votes, or `None` when unloaded.
    pub fn get(&self) -> Option<Vec<Vote>> {
        self.read().clone()
    }

    /// Runs `f` over the loaded votes without copying them.
    ///
    /// # Returns
    ///
    /// * `Some(R)` - The relation is loaded and `f` ran
    /// * `None` - The relation is unloaded
    pub fn with_loaded<R>(&self, f: impl FnOnce(&[Vote]) -> R) -> Option<R> {
        self.read().as_deref().map(f)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Vec<Vote>>> {
        self.votes.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Vec<Vote>>> {
        self.votes.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for VoteRelation {
    fn clone(&self) -> Self {
        Self {
            votes: RwLock::new(self.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use votes_shared::types::{VotableRef, VoteItem};

    fn make_vote(id: i64) -> Vote {
        Vote {
            id,
            voter_id: 1,
            votable: VotableRef::new("posts", id),
            vote_type: VoteItem::Up,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_new_relation_is_unloaded() {
        let relation = VoteRelation::new();
        assert!(!relation.is_loaded());
        assert_eq!(relation.get(), None);
        assert_eq!(relation.with_loaded(|votes| votes.len()), None);
    }

    #[test]
    fn test_empty_loaded_relation_is_loaded() {
        let relation = VoteRelation::loaded(Vec::new());
        assert!(relation.is_loaded());
        assert_eq!(relation.with_loaded(|votes| votes.len()), Some(0));
    }

    #[test]
    fn test_set_and_unset() {
        let relation = VoteRelation::new();
        relation.set(vec![make_vote(1), make_vote(2)]);
        assert_eq!(relation.with_loaded(|votes| votes.len()), Some(2));

        relation.unset();
        assert!(!relation.is_loaded());
    }

    #[test]
    fn test_clone_is_independent() {
        let relation = VoteRelation::loaded(vec![make_vote(1)]);
        let copy = relation.clone();
        relation.unset();
        assert!(copy.is_loaded());
    }
}
