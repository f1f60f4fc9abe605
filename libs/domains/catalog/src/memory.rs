//! In-memory implementation of CatalogRepository
//!
//! Backs unit tests and embedded use. `find_with_reviews` runs the
//! application-level stages from [`crate::pipeline`].

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{CreateProduct, Product, ProductWithReviews, Review};
use crate::pipeline;
use crate::repository::CatalogRepository;

/// Catalog and review stores held behind async locks
///
/// Clones share the same underlying stores.
#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    products: Arc<RwLock<BTreeMap<Uuid, Product>>>,
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a review, as the review component would
    pub async fn insert_review(&self, review: Review) {
        self.reviews.write().await.push(review);
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let product = Product::new(input);
        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let removed = self.products.write().await.remove(&id);
        if removed.is_some() {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(removed)
    }

    #[instrument(skip(self, input))]
    async fn replace(&self, id: Uuid, input: CreateProduct) -> CatalogResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        product.replace_with(input);

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(Some(product.clone()))
    }

    #[instrument(skip(self))]
    async fn find_with_reviews(
        &self,
        category: &str,
        limit: i64,
    ) -> CatalogResult<Vec<ProductWithReviews>> {
        let products = self.products.read().await;
        let reviews = self.reviews.read().await;

        let result =
            pipeline::find_with_reviews(products.values(), reviews.iter(), category, limit);

        tracing::debug!(count = result.len(), "Products with reviews loaded");
        Ok(result)
    }
}
