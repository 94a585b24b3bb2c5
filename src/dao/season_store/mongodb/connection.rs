use std::time::Duration;

use mongodb::{Client, Database, IndexModel, bson::doc, options::IndexOptions};
use tokio::time::sleep;
use tracing::{debug, info};

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::MongoSeasonDocument,
};

pub const LEAGUE_COLLECTION_NAME: &str = "leagues";
pub const SEASON_COLLECTION_NAME: &str = "seasons";

const SEASON_LEAGUE_INDEX: &str = "season_league_idx";
const APP_NAME: &str = "record-label-league";

/// Exponential backoff used while waiting for the first ping.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Open the season database: build a client, wait until it answers a ping and
/// make sure the season indexes exist. Used for the first connection and for
/// every reconnect.
pub async fn open_season_database(config: &MongoConfig) -> MongoResult<(Client, Database)> {
    let mut options = config.options.clone();
    options.app_name.get_or_insert_with(|| APP_NAME.to_owned());

    let client = Client::with_options(options)
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);

    wait_for_ping(&database, RetryPolicy::default()).await?;
    ensure_season_indexes(&database).await?;

    info!(database = %config.database_name, "season database ready");
    Ok((client, database))
}

async fn wait_for_ping(database: &Database, policy: RetryPolicy) -> MongoResult<()> {
    let mut attempts = 0;
    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok(()),
            Err(err) => {
                attempts += 1;
                if attempts >= policy.max_attempts {
                    return Err(MongoDaoError::InitialPing {
                        attempts,
                        source: err,
                    });
                }
                let delay = policy.delay(attempts);
                debug!(
                    database = %database.name(),
                    attempts,
                    delay_ms = delay.as_millis() as u64,
                    "MongoDB ping failed; retrying"
                );
                sleep(delay).await;
            }
        }
    }
}

/// Seasons are listed per league in creation order.
async fn ensure_season_indexes(database: &Database) -> MongoResult<()> {
    let index = IndexModel::builder()
        .keys(doc! {"league_id": 1, "created_at": 1})
        .options(
            IndexOptions::builder()
                .name(Some(SEASON_LEAGUE_INDEX.to_owned()))
                .build(),
        )
        .build();

    database
        .collection::<MongoSeasonDocument>(SEASON_COLLECTION_NAME)
        .create_index(index)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection: SEASON_COLLECTION_NAME,
            index: SEASON_LEAGUE_INDEX,
            source,
        })?;
    Ok(())
}
