//! Database connectors used by the catalog crates
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction, health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//! - `all` - everything above
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_database};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "catalog");
//! let db = connect_database(&config, None).await?;
//! let products = db.collection::<Document>("products");
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry, retry_with_backoff};
