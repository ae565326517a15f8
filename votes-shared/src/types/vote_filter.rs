use crate::types::{VotableRef, Vote, VoteItem, VoterId};

/// Criteria selecting rows of the votes table.
///
/// Every field left as `None` is unconstrained, so `VoteFilter::default()`
/// selects every vote. The builder methods mirror the scopes callers use
/// most: votes of a voter, votes on a votable, restricted by votable type or
/// by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteFilter {
    pub voter_id: Option<VoterId>,
    pub votables: Option<Vec<VotableRef>>,
    pub votable_type: Option<String>,
    pub vote_type: Option<VoteItem>,
}

impl VoteFilter {
    /// Votes cast by `voter_id`.
    pub fn for_voter(voter_id: VoterId) -> Self {
        Self {
            voter_id: Some(voter_id),
            ..Self::default()
        }
    }

    /// Votes received by `votable`.
    pub fn for_votable(votable: VotableRef) -> Self {
        Self::default().on(votable)
    }

    /// Restricts the filter to a single votable.
    pub fn on(self, votable: VotableRef) -> Self {
        self.on_many(vec![votable])
    }

    /// Restricts the filter to any of the given votables.
    pub fn on_many(mut self, votables: Vec<VotableRef>) -> Self {
        self.votables = Some(votables);
        self
    }

    pub fn with_votable_type(mut self, votable_type: impl Into<String>) -> Self {
        self.votable_type = Some(votable_type.into());
        self
    }

    pub fn with_vote_type(mut self, vote_type: VoteItem) -> Self {
        self.vote_type = Some(vote_type);
        self
    }

    /// Same as `with_vote_type`, keeping the filter unchanged for `None`.
    pub fn with_optional_vote_type(mut self, vote_type: Option<VoteItem>) -> Self {
        self.vote_type = vote_type.or(self.vote_type);
        self
    }

    /// Returns true if the filter can only match an empty set.
    pub fn is_empty_selection(&self) -> bool {
        matches!(&self.votables, Some(votables) if votables.is_empty())
    }

    /// Evaluates the filter against a vote held in memory.
    pub fn matches(&self, vote: &Vote) -> bool {
        self.voter_id.is_none_or(|id| vote.voter_id == id)
            && self
                .votables
                .as_ref()
                .is_none_or(|votables| votables.contains(&vote.votable))
            && self
                .votable_type
                .as_ref()
                .is_none_or(|t| &vote.votable.votable_type == t)
            && self.vote_type.is_none_or(|item| vote.vote_type == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn make_vote(voter_id: VoterId, votable_type: &str, votable_id: i64, vote_type: VoteItem) -> Vote {
        Vote {
            id: 1,
            voter_id,
            votable: VotableRef::new(votable_type, votable_id),
            vote_type,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_default_matches_everything() {
        let filter = VoteFilter::default();
        assert!(filter.matches(&make_vote(1, "posts", 1, VoteItem::Up)));
        assert!(filter.matches(&make_vote(2, "books", 9, VoteItem::Down)));
    }

    #[test]
    fn test_voter_and_direction_scopes() {
        let filter = VoteFilter::for_voter(1).with_vote_type(VoteItem::Down);
        assert!(filter.matches(&make_vote(1, "posts", 1, VoteItem::Down)));
        assert!(!filter.matches(&make_vote(1, "posts", 1, VoteItem::Up)));
        assert!(!filter.matches(&make_vote(2, "posts", 1, VoteItem::Down)));
    }

    #[test]
    fn test_votable_type_scope() {
        let filter = VoteFilter::for_voter(1).with_votable_type("books");
        assert!(filter.matches(&make_vote(1, "books", 3, VoteItem::Up)));
        assert!(!filter.matches(&make_vote(1, "posts", 3, VoteItem::Up)));
    }

    #[test]
    fn test_votables_scope() {
        let filter = VoteFilter::for_voter(1)
            .on_many(vec![VotableRef::new("posts", 1), VotableRef::new("books", 1)]);
        assert!(filter.matches(&make_vote(1, "posts", 1, VoteItem::Up)));
        assert!(filter.matches(&make_vote(1, "books", 1, VoteItem::Up)));
        assert!(!filter.matches(&make_vote(1, "posts", 2, VoteItem::Up)));
    }

    #[test]
    fn test_optional_vote_type_keeps_existing() {
        let filter = VoteFilter::default()
            .with_vote_type(VoteItem::Up)
            .with_optional_vote_type(None);
        assert_eq!(filter.vote_type, Some(VoteItem::Up));
    }

    #[test]
    fn test_empty_selection() {
        assert!(VoteFilter::for_voter(1).on_many(vec![]).is_empty_selection());
        assert!(!VoteFilter::for_voter(1).is_empty_selection());
    }
}
