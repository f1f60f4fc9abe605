use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{CreateProduct, Product, ProductWithReviews};

/// Repository trait for catalog persistence
///
/// Each method is a single request to the backing store. Absent products are
/// reported as `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a new product with a generated key
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Remove a product, returning it as it was before removal
    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Overwrite a product's attributes, returning the updated record
    async fn replace(&self, id: Uuid, input: CreateProduct) -> CatalogResult<Option<Product>>;

    /// Products in `category`, by key ascending, at most `limit`, each joined
    /// with its reviews (newest first) and rating statistics
    async fn find_with_reviews(
        &self,
        category: &str,
        limit: i64,
    ) -> CatalogResult<Vec<ProductWithReviews>>;
}
