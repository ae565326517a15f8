use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use tracing::debug;
use votes_shared::types::{
    NewVote, VotableRef, Vote, VoteFilter, VoteItem, VoteReplacement, VoterId, VotesCount,
};

use crate::config::VotesConfig;
use crate::postgres::VoteScopes;
use crate::postgres::statements::VoteStatements;
use crate::{VotesRepository, VotesRepositoryError};

/// Row shape shared by every statement returning votes.
#[derive(sqlx::FromRow)]
struct VoteRow {
    id: i64,
    voter_id: i64,
    votable_type: String,
    votable_id: i64,
    vote_type: String,
    created_at: OffsetDateTime,
}

impl TryFrom<VoteRow> for Vote {
    type Error = VotesRepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            id: row.id,
            voter_id: row.voter_id,
            votable: VotableRef::new(row.votable_type, row.votable_id),
            vote_type: row.vote_type.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VotesCountRow {
    votable_type: String,
    votable_id: i64,
    total_votes: i64,
    total_up_votes: i64,
    total_down_votes: i64,
}

/// PostgreSQL implementation of the votes repository.
///
/// ## Features
///
/// - Connection pooling with `sqlx::PgPool`
/// - Table and voter column names from `VotesConfig`, rendered once
/// - `replace_vote` wraps delete and insert in one transaction
/// - Batch counts in a single statement using `UNNEST` and correlated subqueries
pub struct PostgresVotesRepository {
    pool: sqlx::PgPool,
    config: VotesConfig,
    statements: VoteStatements,
}

impl PostgresVotesRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    /// * `config` - Names of the votes table and voter column
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVotesRepository)` - Ready-to-use repository instance
    /// * `Err(VotesRepositoryError::InvalidIdentifier)` - The config holds an unsafe name
    pub async fn new(pool: sqlx::PgPool, config: VotesConfig) -> Result<Self, VotesRepositoryError> {
        config.validate()?;
        let statements = VoteStatements::new(&config);
        Ok(Self {
            pool,
            config,
            statements,
        })
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }

    /// Scopes bound to this repository's table, for callers' entity queries.
    pub fn scopes(&self) -> VoteScopes {
        VoteScopes::from_validated(&self.config)
    }

    /// Applies the bundled migrations, creating the default `votes` table.
    pub async fn migrate(&self) -> Result<(), VotesRepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Deletes the vote of a pair within an active transaction.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vote))` - The deleted row
    /// * `Ok(None)` - The pair had no vote
    /// * `Err(VotesRepositoryError)` - Database or decoding error
    async fn delete_vote_tx(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
        tx: &mut sqlx::Transaction<'_, Postgres>,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&self.statements.delete)
            .bind(voter_id)
            .bind(votable.votable_type.as_str())
            .bind(votable.votable_id)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(Vote::try_from).transpose()
    }

    /// Inserts a vote within an active transaction.
    ///
    /// A unique violation on the (voter, votable) constraint is reported as
    /// `DuplicateVote`.
    async fn insert_vote_tx(
        &self,
        vote: &NewVote,
        tx: &mut sqlx::Transaction<'_, Postgres>,
    ) -> Result<Vote, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&self.statements.insert)
            .bind(vote.voter_id)
            .bind(vote.votable.votable_type.as_str())
            .bind(vote.votable.votable_id)
            .bind(vote.vote_type.as_str())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| map_insert_error(e, vote))?;

        Vote::try_from(row)
    }
}

fn map_insert_error(error: sqlx::Error, vote: &NewVote) -> VotesRepositoryError {
    let is_unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());

    if is_unique_violation {
        VotesRepositoryError::DuplicateVote {
            voter_id: vote.voter_id,
            votable: vote.votable.clone(),
        }
    } else {
        VotesRepositoryError::DatabaseError(error)
    }
}

/// Removes repeated references, keeping first-seen order.
fn distinct(votables: &[VotableRef]) -> Vec<VotableRef> {
    let mut seen = std::collections::HashSet::with_capacity(votables.len());
    votables
        .iter()
        .filter(|votable| seen.insert(*votable))
        .cloned()
        .collect()
}

#[async_trait]
impl VotesRepository for PostgresVotesRepository {
    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote, VotesRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let created = self.insert_vote_tx(vote, &mut tx).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Deletes the current vote of the pair and inserts the new one in a
    /// single transaction. Either both happen or neither does.
    async fn replace_vote(&self, vote: &NewVote) -> Result<VoteReplacement, VotesRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let removed = self.delete_vote_tx(vote.voter_id, &vote.votable, &mut tx).await?;
        let created = self.insert_vote_tx(vote, &mut tx).await?;
        tx.commit().await?;

        debug!(
            voter_id = vote.voter_id,
            votable = %vote.votable,
            replaced = removed.is_some(),
            "Vote replaced"
        );
        Ok(VoteReplacement { removed, created })
    }

    async fn delete_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let removed = self.delete_vote_tx(voter_id, votable, &mut tx).await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn find_vote(
        &self,
        voter_id: VoterId,
        votable: &VotableRef,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&self.statements.find)
            .bind(voter_id)
            .bind(votable.votable_type.as_str())
            .bind(votable.votable_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vote::try_from).transpose()
    }

    async fn find_votes(&self, filter: &VoteFilter) -> Result<Vec<Vote>, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Postgres>::new(&self.statements.select);
        self.statements.push_filter(&mut query_builder, filter);
        query_builder.push(" ORDER BY id ASC");

        let rows = query_builder
            .build_query_as::<VoteRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Vote::try_from).collect()
    }

    async fn count_votes(&self, filter: &VoteFilter) -> Result<i64, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(0);
        }

        let mut query_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", self.statements.table));
        self.statements.push_filter(&mut query_builder, filter);

        let count = query_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn exists(&self, filter: &VoteFilter) -> Result<bool, VotesRepositoryError> {
        if filter.is_empty_selection() {
            return Ok(false);
        }

        let mut query_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT EXISTS(SELECT 1 FROM {}", self.statements.table));
        self.statements.push_filter(&mut query_builder, filter);
        query_builder.push(")");

        let exists = query_builder
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Aggregates the batch with one statement: the input references are
    /// unnested and each count is a correlated subquery on the votes table.
    async fn votes_counts(
        &self,
        votables: &[VotableRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError> {
        let votables = distinct(votables);
        if votables.is_empty() {
            return Ok(Vec::new());
        }

        let votable_types: Vec<String> = votables.iter().map(|v| v.votable_type.clone()).collect();
        let votable_ids: Vec<i64> = votables.iter().map(|v| v.votable_id).collect();
        let table = &self.statements.table;
        let correlated = format!(
            "SELECT COUNT(*) FROM {table} v WHERE v.votable_type = input.votable_type AND v.votable_id = input.votable_id"
        );
        let sql = format!(
            r#"
            SELECT input.votable_type, input.votable_id,
                ({correlated}) AS total_votes,
                ({correlated} AND v.vote_type = '{up}') AS total_up_votes,
                ({correlated} AND v.vote_type = '{down}') AS total_down_votes
            FROM UNNEST($1::text[], $2::bigint[]) WITH ORDINALITY AS input(votable_type, votable_id, position)
            ORDER BY input.position
            "#,
            up = VoteItem::UP,
            down = VoteItem::DOWN,
        );

        let rows = sqlx::query_as::<_, VotesCountRow>(&sql)
            .bind(votable_types)
            .bind(votable_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| VotesCount {
                votable: VotableRef::new(row.votable_type, row.votable_id),
                total_votes: row.total_votes,
                total_up_votes: row.total_up_votes,
                total_down_votes: row.total_down_votes,
            })
            .collect())
    }

    /// Checks if the votes table is created in the database.
    ///
    /// A schema-qualified table name is matched on both schema and table.
    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError> {
        let table = self.statements.table.as_str();
        let (schema, table_name) = match table.rsplit_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, table),
        };

        let table_exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM information_schema.tables
                WHERE table_name = $1 AND ($2::text IS NULL OR table_schema = $2)
            )
            "#,
        )
        .bind(table_name)
        .bind(schema)
        .fetch_one(&self.pool)
        .await?;

        Ok(table_exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let votables = vec![
            VotableRef::new("posts", 2),
            VotableRef::new("books", 1),
            VotableRef::new("posts", 2),
            VotableRef::new("posts", 1),
        ];
        assert_eq!(
            distinct(&votables),
            vec![
                VotableRef::new("posts", 2),
                VotableRef::new("books", 1),
                VotableRef::new("posts", 1),
            ]
        );
    }

    #[test]
    fn test_row_with_unknown_vote_type_is_rejected() {
        let row = VoteRow {
            id: 1,
            voter_id: 1,
            votable_type: "posts".to_string(),
            votable_id: 1,
            vote_type: "sideways".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert!(matches!(
            Vote::try_from(row),
            Err(VotesRepositoryError::InvalidVoteType(_))
        ));
    }
}
