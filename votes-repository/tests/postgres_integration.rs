//! Integration tests for the PostgreSQL votes repository implementation.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup. They are ignored by default.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration -- --ignored`

use sqlx::{Postgres, QueryBuilder, Row};
use votes_repository::{PostgresVotesRepository, VotesConfig, VotesRepository, VotesRepositoryError};
use votes_shared::types::{NewVote, VotableRef, VoteFilter, VoteItem};

async fn make_repository(pool: &sqlx::PgPool) -> PostgresVotesRepository {
    PostgresVotesRepository::new(pool.clone(), VotesConfig::default())
        .await
        .unwrap()
}

fn post(id: i64) -> VotableRef {
    VotableRef::new("posts", id)
}

fn book(id: i64) -> VotableRef {
    VotableRef::new("books", id)
}

// ============================================================================
// Mutation Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_insert_vote(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;

    let vote = repository
        .insert_vote(&NewVote::new(1, post(1), VoteItem::Up))
        .await
        .unwrap();

    assert_eq!(vote.voter_id, 1);
    assert_eq!(vote.votable, post(1));
    assert!(vote.is_up());

    let row = sqlx::query("SELECT user_id, vote_type FROM votes WHERE id = $1")
        .bind(vote.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i64, _>("user_id"), 1);
    assert_eq!(row.get::<String, _>("vote_type"), "up_vote");
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_insert_duplicate_vote_is_rejected(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    repository
        .insert_vote(&NewVote::new(1, post(1), VoteItem::Up))
        .await
        .unwrap();

    let result = repository
        .insert_vote(&NewVote::new(1, post(1), VoteItem::Down))
        .await;

    assert!(matches!(result, Err(VotesRepositoryError::DuplicateVote { voter_id: 1, .. })));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_replace_vote_switches_direction(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    let up = repository
        .insert_vote(&NewVote::new(1, post(1), VoteItem::Up))
        .await
        .unwrap();

    let replacement = repository
        .replace_vote(&NewVote::new(1, post(1), VoteItem::Down))
        .await
        .unwrap();

    assert_eq!(replacement.removed.as_ref().map(|v| v.id), Some(up.id));
    assert_ne!(replacement.created.id, up.id);
    assert!(replacement.created.is_down());

    let rows = sqlx::query("SELECT vote_type FROM votes WHERE user_id = 1")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>("vote_type"), "down_vote");
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_replace_vote_without_previous(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;

    let replacement = repository
        .replace_vote(&NewVote::new(1, post(1), VoteItem::Up))
        .await
        .unwrap();

    assert!(replacement.removed.is_none());
    assert!(replacement.created.is_up());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_delete_vote(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    let vote = repository
        .insert_vote(&NewVote::new(1, post(1), VoteItem::Up))
        .await
        .unwrap();

    assert_eq!(repository.delete_vote(1, &post(1)).await.unwrap(), Some(vote));
    assert_eq!(repository.delete_vote(1, &post(1)).await.unwrap(), None);
    assert_eq!(repository.find_vote(1, &post(1)).await.unwrap(), None);
}

// ============================================================================
// Query Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_voter_scopes(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    for (votable, vote_type) in [
        (post(1), VoteItem::Up),
        (post(2), VoteItem::Up),
        (post(3), VoteItem::Down),
        (book(1), VoteItem::Up),
        (book(2), VoteItem::Up),
        (book(3), VoteItem::Down),
    ] {
        repository
            .insert_vote(&NewVote::new(1, votable, vote_type))
            .await
            .unwrap();
    }

    let voter = VoteFilter::for_voter(1);
    assert_eq!(repository.count_votes(&voter).await.unwrap(), 6);
    assert_eq!(
        repository.count_votes(&voter.clone().with_vote_type(VoteItem::Up)).await.unwrap(),
        4
    );
    assert_eq!(
        repository.count_votes(&voter.clone().with_votable_type("books")).await.unwrap(),
        3
    );
    assert_eq!(
        repository
            .count_votes(&voter.clone().with_vote_type(VoteItem::Down).with_votable_type("books"))
            .await
            .unwrap(),
        1
    );

    let votes = repository.find_votes(&voter.with_votable_type("posts")).await.unwrap();
    let ids: Vec<i64> = votes.iter().map(|v| v.votable.votable_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_find_votes_for_many_votables(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    repository.insert_vote(&NewVote::new(1, post(1), VoteItem::Up)).await.unwrap();
    repository.insert_vote(&NewVote::new(2, post(1), VoteItem::Down)).await.unwrap();
    repository.insert_vote(&NewVote::new(1, book(1), VoteItem::Up)).await.unwrap();
    repository.insert_vote(&NewVote::new(1, post(9), VoteItem::Up)).await.unwrap();

    let filter = VoteFilter::default().on_many(vec![post(1), book(1)]);
    let votes = repository.find_votes(&filter).await.unwrap();
    assert_eq!(votes.len(), 3);

    assert!(repository.exists(&VoteFilter::for_voter(2).on(post(1))).await.unwrap());
    assert!(
        !repository
            .exists(&VoteFilter::for_voter(2).on(post(1)).with_vote_type(VoteItem::Up))
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_votes_counts(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    repository.insert_vote(&NewVote::new(1, post(1), VoteItem::Up)).await.unwrap();
    repository.insert_vote(&NewVote::new(2, post(1), VoteItem::Up)).await.unwrap();
    repository.insert_vote(&NewVote::new(3, post(1), VoteItem::Down)).await.unwrap();
    repository.insert_vote(&NewVote::new(1, post(2), VoteItem::Down)).await.unwrap();

    let counts = repository
        .votes_counts(&[post(2), post(1), post(3), post(1)])
        .await
        .unwrap();

    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0].votable, post(2));
    assert_eq!((counts[0].total_votes, counts[0].total_up_votes, counts[0].total_down_votes), (1, 0, 1));
    assert_eq!(counts[1].votable, post(1));
    assert_eq!((counts[1].total_votes, counts[1].total_up_votes, counts[1].total_down_votes), (3, 2, 1));
    assert_eq!(counts[2].votable, post(3));
    assert_eq!(counts[2].total_votes, 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_check_tables_created(pool: sqlx::PgPool) {
    let repository = make_repository(&pool).await;
    assert!(repository.check_tables_created().await.unwrap());

    let missing = PostgresVotesRepository::new(pool.clone(), VotesConfig::default().with_table("missing_votes"))
        .await
        .unwrap();
    assert!(!missing.check_tables_created().await.unwrap());
}

// ============================================================================
// Scope Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_scopes_on_entity_query(pool: sqlx::PgPool) {
    sqlx::query("CREATE TABLE posts (id BIGSERIAL PRIMARY KEY, title TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO posts (title) VALUES ('Hello world!'), ('Hello everyone!'), ('Hello players!')")
        .execute(&pool)
        .await
        .unwrap();

    let repository = make_repository(&pool).await;
    repository.insert_vote(&NewVote::new(1, post(1), VoteItem::Up)).await.unwrap();
    repository.insert_vote(&NewVote::new(2, post(1), VoteItem::Down)).await.unwrap();
    repository.insert_vote(&NewVote::new(1, post(3), VoteItem::Down)).await.unwrap();

    let scopes = repository.scopes();

    let mut query = QueryBuilder::<Postgres>::new("SELECT posts.id, ");
    scopes.push_votes_count_columns(&mut query, "posts.id", "posts").unwrap();
    query.push(" FROM posts ORDER BY posts.id");
    let rows = query.build().fetch_all(&pool).await.unwrap();

    let totals: Vec<(i64, i64, i64)> = rows
        .iter()
        .map(|row| {
            (
                row.get::<i64, _>("total_votes"),
                row.get::<i64, _>("total_up_votes"),
                row.get::<i64, _>("total_down_votes"),
            )
        })
        .collect();
    assert_eq!(totals, vec![(2, 1, 1), (0, 0, 0), (1, 0, 1)]);

    let mut query = QueryBuilder::<Postgres>::new("SELECT posts.id FROM posts WHERE");
    scopes
        .push_voted_by(&mut query, "posts.id", "posts", 1, Some(VoteItem::Down))
        .unwrap();
    let rows = query.build().fetch_all(&pool).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.get::<i64, _>("id")).collect();
    assert_eq!(ids, vec![3]);
}
