use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use votes::{Dependencies, VotesError};
use votes_repository::VotesRepository;

/// Main entry point of the votes store.
///
/// Loads `.env`, initializes tracing, wires the dependencies, applies the
/// votes table migrations and checks that the configured table exists.
///
/// # Returns
///
/// A `Result` indicating success or a `VotesError` if an error occurs
/// during initialization or migration.
#[tokio::main]
async fn main() -> Result<(), VotesError> {
    dotenv().ok();
    init_tracing();

    let dependencies = Dependencies::new().await?;
    dependencies.repository.migrate().await?;

    if dependencies.repository.check_tables_created().await? {
        info!(
            service_name = "votes",
            service_version = env!("CARGO_PKG_VERSION"),
            "Votes table ready"
        );
    } else {
        warn!(
            "Configured votes table not found; the bundled migrations only create the default `votes` table"
        );
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "votes=info,votes_engine=info,votes_repository=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .json(),
        )
        .init();
}
