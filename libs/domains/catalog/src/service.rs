//! Catalog Service - the read/write façade over a CatalogRepository

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, FindProduct, Product, ProductWithReviews};
use crate::repository::CatalogRepository;

/// Catalog service
///
/// Validates caller input, turns string keys into product IDs, and issues
/// exactly one repository call per operation. Store errors propagate
/// unchanged; there is no retry or caching here.
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Get a product by key
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, key: &str) -> CatalogResult<Option<Product>> {
        let id = parse_key(key)?;
        self.repository.get_by_id(id).await
    }

    /// Delete a product, returning it as it was before removal
    ///
    /// Reviews of the product are left in place.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, key: &str) -> CatalogResult<Option<Product>> {
        let id = parse_key(key)?;
        self.repository.delete(id).await
    }

    /// Replace a product's attributes with `input`, returning the new record
    #[instrument(skip(self, input))]
    pub async fn update_by_id(
        &self,
        key: &str,
        input: CreateProduct,
    ) -> CatalogResult<Option<Product>> {
        let id = parse_key(key)?;
        input.validate()?;
        self.repository.replace(id, input).await
    }

    /// Products in a category joined with their reviews and rating statistics
    #[instrument(skip(self))]
    pub async fn find_with_reviews(
        &self,
        filter: FindProduct,
    ) -> CatalogResult<Vec<ProductWithReviews>> {
        filter.validate()?;
        self.repository
            .find_with_reviews(&filter.category, filter.limit)
            .await
    }
}

impl<R: CatalogRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn parse_key(key: &str) -> CatalogResult<Uuid> {
    Uuid::parse_str(key)
        .map_err(|_| CatalogError::Validation(format!("Invalid product id '{}'", key)))
}
