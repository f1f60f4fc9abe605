use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Named product attribute shown in a specification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductCharacteristic {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub value: String,
}

/// Product entity - stored in the products collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Price in cents
    pub price: i64,
    /// Price before a discount, in cents
    #[serde(default)]
    pub old_price: Option<i64>,
    /// Monthly instalment, in cents
    #[serde(default)]
    pub credit: Option<i64>,
    /// Category labels; a product may sit in several
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub advantages: Option<String>,
    #[serde(default)]
    pub disadvantages: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<ProductCharacteristic>,
    /// Creation timestamp, never changed by updates
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product, and for replacing one on update
///
/// Every field is written on update, so omitted optional fields are cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 2048))]
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub old_price: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub credit: Option<i64>,
    #[validate(length(min = 1, max = 20), custom(function = "validate_labels"))]
    pub categories: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50), custom(function = "validate_labels"))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub advantages: Option<String>,
    #[serde(default)]
    pub disadvantages: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub characteristics: Vec<ProductCharacteristic>,
}

/// Filter for the products-with-reviews read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FindProduct {
    /// Category label the product must carry
    #[validate(custom(function = "validate_label"))]
    pub category: String,
    /// Maximum number of products returned
    #[validate(range(min = 1))]
    pub limit: i64,
}

/// Review entity - stored in the reviews collection
///
/// Reviews are written by the review component; the catalog only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Key of the reviewed product
    pub product_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Rating from 1 to 5
    pub rating: i32,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// A product joined with its reviews and rating statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: Product,
    /// Newest first
    pub reviews: Vec<Review>,
    /// Always equal to `reviews.len()`
    pub review_count: u64,
    /// Mean rating, absent when there are no reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_avg: Option<f64>,
}

impl Product {
    /// Create a new product from a CreateProduct payload
    pub fn new(input: CreateProduct) -> Self {
        Self::with_id(Uuid::now_v7(), input, now())
    }

    fn with_id(id: Uuid, input: CreateProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            image: input.image,
            price: input.price,
            old_price: input.old_price,
            credit: input.credit,
            categories: input.categories,
            tags: input.tags,
            advantages: input.advantages,
            disadvantages: input.disadvantages,
            characteristics: input.characteristics,
            created_at,
        }
    }

    /// Overwrite every attribute with `input`, keeping the key and creation time
    pub fn replace_with(&mut self, input: CreateProduct) {
        *self = Self::with_id(self.id, input, self.created_at);
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// The attributes a caller supplied, without key and timestamp
    pub fn attributes(&self) -> CreateProduct {
        CreateProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price,
            old_price: self.old_price,
            credit: self.credit,
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            advantages: self.advantages.clone(),
            disadvantages: self.disadvantages.clone(),
            characteristics: self.characteristics.clone(),
        }
    }
}

impl Review {
    pub fn new(product_id: Uuid, rating: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            product_id,
            name: String::new(),
            title: String::new(),
            description: String::new(),
            rating,
            created_at: now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Current time at the millisecond precision BSON dates store
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::new("blank_label"));
    }
    if label.len() > 100 {
        return Err(ValidationError::new("label_too_long"));
    }
    Ok(())
}

fn validate_labels(labels: &[String]) -> Result<(), ValidationError> {
    labels.iter().try_for_each(|label| validate_label(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateProduct {
        CreateProduct {
            name: "The Rust Programming Language".to_string(),
            description: Some("The book".to_string()),
            image: None,
            price: 3999,
            old_price: Some(4999),
            credit: None,
            categories: vec!["books".to_string(), "programming".to_string()],
            tags: vec!["rust".to_string()],
            advantages: None,
            disadvantages: None,
            characteristics: vec![ProductCharacteristic {
                name: "pages".to_string(),
                value: "560".to_string(),
            }],
        }
    }

    #[test]
    fn test_product_new_copies_payload() {
        let product = Product::new(payload());
        assert_eq!(product.attributes(), payload());
        assert_eq!(product.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_replace_with_keeps_identity() {
        let mut product = Product::new(payload());
        let (id, created_at) = (product.id, product.created_at);

        let mut update = payload();
        update.name = "Programming Rust".to_string();
        update.old_price = None;
        product.replace_with(update.clone());

        assert_eq!(product.id, id);
        assert_eq!(product.created_at, created_at);
        assert_eq!(product.attributes(), update);
    }

    #[test]
    fn test_has_category() {
        let product = Product::new(payload());
        assert!(product.has_category("books"));
        assert!(!product.has_category("book"));
    }

    #[test]
    fn test_create_product_validation() {
        assert!(payload().validate().is_ok());

        let mut no_categories = payload();
        no_categories.categories.clear();
        assert!(no_categories.validate().is_err());

        let mut blank_category = payload();
        blank_category.categories.push("  ".to_string());
        assert!(blank_category.validate().is_err());

        let mut negative_price = payload();
        negative_price.price = -1;
        assert!(negative_price.validate().is_err());

        let mut empty_name = payload();
        empty_name.name.clear();
        assert!(empty_name.validate().is_err());

        let mut bad_characteristic = payload();
        bad_characteristic.characteristics[0].name.clear();
        assert!(bad_characteristic.validate().is_err());
    }

    #[test]
    fn test_find_product_validation() {
        let ok = FindProduct {
            category: "books".to_string(),
            limit: 10,
        };
        assert!(ok.validate().is_ok());

        let zero_limit = FindProduct { limit: 0, ..ok.clone() };
        assert!(zero_limit.validate().is_err());

        let blank = FindProduct {
            category: " ".to_string(),
            ..ok
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_product_with_reviews_json_shape() {
        let product = Product::new(payload());
        let with_reviews = ProductWithReviews {
            product,
            reviews: vec![],
            review_count: 0,
            review_avg: None,
        };
        let json = serde_json::to_value(&with_reviews).unwrap();

        assert_eq!(json["name"], "The Rust Programming Language");
        assert_eq!(json["review_count"], 0);
        assert!(json.get("review_avg").is_none());
        assert!(json.get("_id").is_some());
    }
}
