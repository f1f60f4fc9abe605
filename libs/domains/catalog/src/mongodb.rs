//! MongoDB implementation of CatalogRepository

use async_trait::async_trait;
use database::mongodb::{connect_database, MongoConfig};
use database::RetryConfig;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, spec::BinarySubtype, to_document, Binary, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::config::{CatalogConfig, DEFAULT_PRODUCTS_COLLECTION, DEFAULT_REVIEWS_COLLECTION};
use crate::error::CatalogResult;
use crate::models::{CreateProduct, Product, ProductWithReviews, Review};
use crate::repository::CatalogRepository;

/// Row shape produced by the find-with-reviews aggregation.
///
/// The product is nested under `product` so it deserializes without
/// flattening BSON.
#[derive(Debug, Deserialize)]
struct ReviewedProductRow {
    product: Product,
    reviews: Vec<Review>,
    review_count: u64,
    review_avg: Option<f64>,
}

impl From<ReviewedProductRow> for ProductWithReviews {
    fn from(row: ReviewedProductRow) -> Self {
        Self {
            product: row.product,
            reviews: row.reviews,
            review_count: row.review_count,
            review_avg: row.review_avg,
        }
    }
}

/// MongoDB implementation of the CatalogRepository
///
/// Products and reviews live in two collections of the same database; the
/// reviews collection is only read, through `$lookup`.
pub struct MongoCatalogRepository {
    products: Collection<Product>,
    reviews: Collection<Review>,
}

impl MongoCatalogRepository {
    /// Repository over the default `products` and `reviews` collections
    pub fn new(db: &Database) -> Self {
        Self::with_collections(db, DEFAULT_PRODUCTS_COLLECTION, DEFAULT_REVIEWS_COLLECTION)
    }

    pub fn with_collections(db: &Database, products: &str, reviews: &str) -> Self {
        Self {
            products: db.collection::<Product>(products),
            reviews: db.collection::<Review>(reviews),
        }
    }

    pub fn from_config(db: &Database, config: &CatalogConfig) -> Self {
        Self::with_collections(db, &config.products_collection, &config.reviews_collection)
    }

    /// Connect (retrying with backoff) and build a repository over the
    /// configured database and collections
    pub async fn connect(
        mongo: &MongoConfig,
        catalog: &CatalogConfig,
        retry: Option<RetryConfig>,
    ) -> CatalogResult<Self> {
        let db = connect_database(mongo, retry).await?;
        Ok(Self::from_config(&db, catalog))
    }

    /// Create the indexes backing the category match and the review join
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let product_indexes = vec![IndexModel::builder()
            .keys(doc! { "categories": 1, "_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_categories_id".to_string())
                    .build(),
            )
            .build()];

        let review_indexes = vec![IndexModel::builder()
            .keys(doc! { "product_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_product_created".to_string())
                    .build(),
            )
            .build()];

        self.products.create_indexes(product_indexes).await?;
        self.reviews.create_indexes(review_indexes).await?;
        tracing::info!("Catalog indexes created successfully");
        Ok(())
    }

    /// Products collection, for advanced operations
    pub fn products(&self) -> &Collection<Product> {
        &self.products
    }

    /// Reviews collection; the catalog itself never writes to it
    pub fn reviews(&self) -> &Collection<Review> {
        &self.reviews
    }

    /// `Uuid` as the driver stores it: documents are written through the
    /// non-human-readable serializer, which emits the 16 raw bytes as generic
    /// binary rather than the hyphenated string `to_bson` would produce.
    fn key_bson(id: Uuid) -> Bson {
        Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: id.as_bytes().to_vec(),
        })
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": Self::key_bson(id) }
    }

    /// Aggregation for the products-with-reviews read
    ///
    /// `$match` → `$sort` → `$limit` → `$replaceWith` → `$lookup` →
    /// `$addFields`. Reviews are sorted newest first inside the lookup and
    /// `$avg` over an empty array yields null.
    fn find_with_reviews_pipeline(category: &str, limit: i64, reviews: &str) -> Vec<Document> {
        vec![
            doc! { "$match": { "categories": category } },
            doc! { "$sort": { "_id": 1 } },
            doc! { "$limit": limit },
            doc! { "$replaceWith": { "product": "$$ROOT" } },
            doc! {
                "$lookup": {
                    "from": reviews,
                    "localField": "product._id",
                    "foreignField": "product_id",
                    "pipeline": [ { "$sort": { "created_at": -1 } } ],
                    "as": "reviews",
                }
            },
            doc! {
                "$addFields": {
                    "review_count": { "$size": "$reviews" },
                    "review_avg": { "$avg": "$reviews.rating" },
                }
            },
        ]
    }
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let product = Product::new(input);

        self.products.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let product = self.products.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let deleted = self
            .products
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if deleted.is_some() {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(deleted)
    }

    #[instrument(skip(self, input))]
    async fn replace(&self, id: Uuid, input: CreateProduct) -> CatalogResult<Option<Product>> {
        // `_id` and `created_at` are not part of the payload, so `$set`
        // leaves them untouched.
        let update = doc! { "$set": to_document(&input)? };

        let updated = self
            .products
            .find_one_and_update(Self::id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn find_with_reviews(
        &self,
        category: &str,
        limit: i64,
    ) -> CatalogResult<Vec<ProductWithReviews>> {
        let pipeline = Self::find_with_reviews_pipeline(category, limit, self.reviews.name());

        let rows: Vec<ReviewedProductRow> = self
            .products
            .aggregate(pipeline)
            .await?
            .with_type::<ReviewedProductRow>()
            .try_collect()
            .await?;

        tracing::debug!(count = rows.len(), "Products with reviews loaded");
        Ok(rows.into_iter().map(ProductWithReviews::from).collect())
    }
}
