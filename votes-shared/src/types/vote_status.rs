use serde::{Deserialize, Serialize};

use crate::types::VoteItem;

/// The vote status of one voter on one votable.
///
/// Attached in bulk to a batch of votables so that rendering a list does not
/// need one lookup per element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    pub has_voted: bool,
    pub has_up_voted: bool,
    pub has_down_voted: bool,
}

impl From<Option<VoteItem>> for VoteStatus {
    fn from(vote_type: Option<VoteItem>) -> Self {
        Self {
            has_voted: vote_type.is_some(),
            has_up_voted: vote_type == Some(VoteItem::Up),
            has_down_voted: vote_type == Some(VoteItem::Down),
        }
    }
}
