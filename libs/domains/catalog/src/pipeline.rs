//! Products-with-reviews read as explicit application-level steps
//!
//! MongoDB evaluates the same stages server-side in a single aggregation
//! (see [`crate::mongodb`]). These functions are the equivalent for stores
//! without a pipeline language, and define the expected result shape:
//!
//! ```text
//! select_by_category → sort_by_key → truncate → attach_reviews
//! ```

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Product, ProductWithReviews, Review};

/// Products whose category labels include `category`
pub fn select_by_category<'a, I>(products: I, category: &str) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .filter(|p| p.has_category(category))
        .cloned()
        .collect()
}

/// Order by key ascending
pub fn sort_by_key(products: &mut [Product]) {
    products.sort_by_key(|p| p.id);
}

/// Keep at most `limit` products; a non-positive limit keeps none
pub fn truncate(products: &mut Vec<Product>, limit: i64) {
    products.truncate(usize::try_from(limit).unwrap_or(0));
}

/// Review count and mean rating; the mean is `None` for no reviews
pub fn review_stats(reviews: &[Review]) -> (u64, Option<f64>) {
    let count = reviews.len() as u64;
    if count == 0 {
        return (0, None);
    }
    let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    (count, Some(total as f64 / count as f64))
}

/// Join `product` with its reviews, newest first, and derive the statistics
pub fn attach_reviews(product: Product, mut reviews: Vec<Review>) -> ProductWithReviews {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let (review_count, review_avg) = review_stats(&reviews);

    ProductWithReviews {
        product,
        reviews,
        review_count,
        review_avg,
    }
}

/// Run every stage over in-memory collections
pub fn find_with_reviews<'a, P, R>(
    products: P,
    reviews: R,
    category: &str,
    limit: i64,
) -> Vec<ProductWithReviews>
where
    P: IntoIterator<Item = &'a Product>,
    R: IntoIterator<Item = &'a Review>,
{
    let mut selected = select_by_category(products, category);
    sort_by_key(&mut selected);
    truncate(&mut selected, limit);

    if selected.is_empty() {
        return Vec::new();
    }

    let mut by_product: HashMap<Uuid, Vec<Review>> =
        selected.iter().map(|p| (p.id, Vec::new())).collect();
    for review in reviews {
        if let Some(group) = by_product.get_mut(&review.product_id) {
            group.push(review.clone());
        }
    }

    selected
        .into_iter()
        .map(|product| {
            let reviews = by_product.remove(&product.id).unwrap_or_default();
            attach_reviews(product, reviews)
        })
        .collect()
}
