use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::VotableId;

/// Polymorphic reference to an entity that can receive votes.
///
/// The pair of a stable type tag (for example `posts`) and the entity id is
/// what the votes table stores. Resolving the tag back to a concrete entity
/// type is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VotableRef {
    pub votable_type: String,
    pub votable_id: VotableId,
}

impl VotableRef {
    pub fn new(votable_type: impl Into<String>, votable_id: VotableId) -> Self {
        Self {
            votable_type: votable_type.into(),
            votable_id,
        }
    }
}

impl fmt::Display for VotableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.votable_type, self.votable_id)
    }
}
