use core_config::{ConfigError, FromEnv, env_or_default};

pub const DEFAULT_PRODUCTS_COLLECTION: &str = "products";
pub const DEFAULT_REVIEWS_COLLECTION: &str = "reviews";

/// Collection names used by the MongoDB repository
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub products_collection: String,
    pub reviews_collection: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_collection: DEFAULT_PRODUCTS_COLLECTION.to_string(),
            reviews_collection: DEFAULT_REVIEWS_COLLECTION.to_string(),
        }
    }
}

/// Environment variables:
/// - `CATALOG_PRODUCTS_COLLECTION` (default `products`)
/// - `CATALOG_REVIEWS_COLLECTION` (default `reviews`)
impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let products_collection =
            env_or_default("CATALOG_PRODUCTS_COLLECTION", DEFAULT_PRODUCTS_COLLECTION);
        let reviews_collection =
            env_or_default("CATALOG_REVIEWS_COLLECTION", DEFAULT_REVIEWS_COLLECTION);

        for (key, value) in [
            ("CATALOG_PRODUCTS_COLLECTION", &products_collection),
            ("CATALOG_REVIEWS_COLLECTION", &reviews_collection),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ParseError {
                    key: key.to_string(),
                    details: "collection name must not be empty".to_string(),
                });
            }
        }

        Ok(Self {
            products_collection,
            reviews_collection,
        })
    }
}
