use thiserror::Error;

/// Errors surfaced by the catalog service and repositories.
///
/// A missing record is not an error: lookups, updates and deletes report it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing caller input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Backend unreachable, timed out, or rejected the request
    #[error("Database error: {0}")]
    Database(String),

    /// A record could not be converted to or from its stored form
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<database::mongodb::MongoError> for CatalogError {
    fn from(err: database::mongodb::MongoError) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for CatalogError {
    fn from(err: bson::ser::Error) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

impl From<bson::de::Error> for CatalogError {
    fn from(err: bson::de::Error) -> Self {
        CatalogError::Internal(err.to_string())
    }
}
