//! MongoDB connection management
//!
//! Builds a pooled [`Client`] from a [`MongoConfig`], verifies it with a
//! `ping`, and exposes health checks for the resulting deployment.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{MongoError, connect, connect_database, connect_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
