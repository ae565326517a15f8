//! SQL rendered from a `VotesConfig`.
//!
//! Table and column names cannot be bound as parameters, so every statement
//! touching the votes table is formatted once, when the repository is built.
use sqlx::{Postgres, QueryBuilder};
use votes_shared::types::VoteFilter;

use crate::config::VotesConfig;

#[derive(Debug, Clone)]
pub(crate) struct VoteStatements {
    pub table: String,
    pub voter_column: String,
    pub insert: String,
    pub delete: String,
    pub find: String,
    pub select: String,
}

impl VoteStatements {
    /// Renders the statements. The config must already be validated.
    pub fn new(config: &VotesConfig) -> Self {
        let table = config.votes_table.clone();
        let voter_column = config.voter_foreign_key.clone();
        let columns = format!(
            "id, {voter_column} AS voter_id, votable_type, votable_id, vote_type, created_at"
        );

        Self {
            insert: format!(
                "INSERT INTO {table} ({voter_column}, votable_type, votable_id, vote_type) \
                 VALUES ($1, $2, $3, $4) RETURNING {columns}"
            ),
            delete: format!(
                "DELETE FROM {table} WHERE {voter_column} = $1 AND votable_type = $2 AND votable_id = $3 \
                 RETURNING {columns}"
            ),
            find: format!(
                "SELECT {columns} FROM {table} WHERE {voter_column} = $1 AND votable_type = $2 AND votable_id = $3"
            ),
            select: format!("SELECT {columns} FROM {table}"),
            table,
            voter_column,
        }
    }

    /// Appends a `WHERE` clause for `filter`.
    pub fn push_filter(&self, query_builder: &mut QueryBuilder<'_, Postgres>, filter: &VoteFilter) {
        query_builder.push(" WHERE TRUE");

        if let Some(voter_id) = filter.voter_id {
            query_builder.push(format!(" AND {} = ", self.voter_column));
            query_builder.push_bind(voter_id);
        }

        if let Some(votable_type) = &filter.votable_type {
            query_builder.push(" AND votable_type = ");
            query_builder.push_bind(votable_type.clone());
        }

        if let Some(votables) = &filter.votables {
            let votable_types: Vec<String> = votables.iter().map(|v| v.votable_type.clone()).collect();
            let votable_ids: Vec<i64> = votables.iter().map(|v| v.votable_id).collect();
            query_builder.push(" AND (votable_type, votable_id) IN (SELECT * FROM UNNEST(");
            query_builder.push_bind(votable_types);
            query_builder.push("::text[], ");
            query_builder.push_bind(votable_ids);
            query_builder.push("::bigint[]))");
        }

        if let Some(vote_type) = filter.vote_type {
            query_builder.push(" AND vote_type = ");
            query_builder.push_bind(vote_type.as_str());
        }
    }
}
