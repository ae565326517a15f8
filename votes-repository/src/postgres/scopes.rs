//! Query-building scopes over the votes table for callers' own entity queries.
//!
//! Listing votables with their counts, or listing what a voter voted on,
//! must not cost one round-trip per row. These scopes append correlated
//! subqueries to a `QueryBuilder` the caller already owns, so the counts or
//! the voter filter are computed inside the caller's single statement.
//!
//! ```ignore
//! let scopes = repository.scopes();
//! let mut query = QueryBuilder::<Postgres>::new("SELECT posts.*, ");
//! scopes.push_votes_count_columns(&mut query, "posts.id", "posts")?;
//! query.push(" FROM posts WHERE");
//! scopes.push_voted_by(&mut query, "posts.id", "posts", user_id, Some(VoteItem::Up))?;
//! ```
use sqlx::{Postgres, QueryBuilder};
use votes_shared::types::{VoteItem, VoterId};

use crate::VotesRepositoryError;
use crate::config::{VotesConfig, validate_identifier};

/// Correlated-subquery builders bound to one votes table.
#[derive(Debug, Clone)]
pub struct VoteScopes {
    table: String,
    voter_column: String,
}

impl VoteScopes {
    /// Builds scopes for the table described by `config`.
    pub fn new(config: &VotesConfig) -> Result<Self, VotesRepositoryError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: &VotesConfig) -> Self {
        Self {
            table: config.votes_table.clone(),
            voter_column: config.voter_foreign_key.clone(),
        }
    }

    /// Appends `total_votes`, `total_up_votes` and `total_down_votes` columns.
    ///
    /// The columns are separated by commas, without a leading or trailing one.
    ///
    /// # Arguments
    ///
    /// * `query_builder` - The caller's query, positioned inside a select list
    /// * `key_column` - Column holding the entity id, e.g. `posts.id`
    /// * `votable_type` - Type tag the entities are stored under
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Columns appended
    /// * `Err(VotesRepositoryError::InvalidIdentifier)` - `key_column` is not a plain identifier
    pub fn push_votes_count_columns(
        &self,
        query_builder: &mut QueryBuilder<'_, Postgres>,
        key_column: &str,
        votable_type: &str,
    ) -> Result<(), VotesRepositoryError> {
        validate_identifier(key_column)?;

        let columns = [
            ("total_votes", None),
            ("total_up_votes", Some(VoteItem::Up)),
            ("total_down_votes", Some(VoteItem::Down)),
        ];
        for (index, (alias, vote_type)) in columns.into_iter().enumerate() {
            if index > 0 {
                query_builder.push(", ");
            }
            query_builder.push(format!(
                "(SELECT COUNT(*) FROM {} WHERE {}.votable_id = {} AND {}.votable_type = ",
                self.table, self.table, key_column, self.table
            ));
            query_builder.push_bind(votable_type.to_string());
            if let Some(vote_type) = vote_type {
                query_builder.push(format!(" AND {}.vote_type = ", self.table));
                query_builder.push_bind(vote_type.as_str());
            }
            query_builder.push(format!(") AS {alias}"));
        }
        Ok(())
    }

    /// Appends a condition keeping the entities `voter_id` voted on.
    ///
    /// Renders ` key_column IN (SELECT votable_id FROM votes WHERE ...)`,
    /// optionally restricted to one direction.
    pub fn push_voted_by(
        &self,
        query_builder: &mut QueryBuilder<'_, Postgres>,
        key_column: &str,
        votable_type: &str,
        voter_id: VoterId,
        vote_type: Option<VoteItem>,
    ) -> Result<(), VotesRepositoryError> {
        validate_identifier(key_column)?;

        query_builder.push(format!(
            " {} IN (SELECT votable_id FROM {} WHERE {} = ",
            key_column, self.table, self.voter_column
        ));
        query_builder.push_bind(voter_id);
        query_builder.push(" AND votable_type = ");
        query_builder.push_bind(votable_type.to_string());
        if let Some(vote_type) = vote_type {
            query_builder.push(" AND vote_type = ");
            query_builder.push_bind(vote_type.as_str());
        }
        query_builder.push(")");
        Ok(())
    }
}
