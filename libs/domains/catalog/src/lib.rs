//! Catalog Domain
//!
//! Data access for catalog products: create, read, update and delete, plus a
//! denormalized read joining products with their reviews and rating
//! statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, key parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, Review, payloads, joined results
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use database::mongodb::MongoConfig;
//! use domain_catalog::{CatalogConfig, CatalogService, FindProduct, MongoCatalogRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mongo = MongoConfig::with_database("mongodb://localhost:27017", "catalog");
//! let catalog = CatalogConfig::from_env()?;
//!
//! let repository = MongoCatalogRepository::connect(&mongo, &catalog, None).await?;
//! repository.init_indexes().await?;
//! let service = CatalogService::new(repository);
//!
//! let books = service
//!     .find_with_reviews(FindProduct { category: "books".into(), limit: 10 })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod pipeline;
pub mod repository;
pub mod service;

pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalogRepository;
pub use models::{
    CreateProduct, FindProduct, Product, ProductCharacteristic, ProductWithReviews, Review,
};
pub use self::mongodb::MongoCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
