use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Error type for MongoDB connection setup
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Build a pooled client from `config` and verify it with a `ping`.
///
/// The driver connects lazily, so without the ping a bad URL or an
/// unreachable server would only surface on the first query.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> Result<Client, MongoError> {
    info!("Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    config.apply(&mut options);

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] with exponential backoff, for services starting alongside
/// their database.
///
/// `None` uses [`RetryConfig::default`].
pub async fn connect_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect(config), policy).await,
        None => retry(|| connect(config)).await,
    }
}

/// Connect with retry and return the configured database handle.
pub async fn connect_database(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Database, MongoError> {
    let client = connect_with_retry(config, retry_config).await?;
    Ok(client.database(config.database()))
}
