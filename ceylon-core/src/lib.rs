pub mod repository;
pub mod service;
pub mod memory;

use std::fmt;

use ceylon_booking::BookingError;
use ceylon_catalog::CatalogError;

pub use repository::{BookingFilter, BookingRepository, CatalogRepository, RepoResult, RepositoryError};
pub use service::{BookingService, CatalogService};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
    #[error("Unavailable: {0}")]
    Unavailable(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Storage error: {0}")]
    Storage(#[source] RepositoryError),
}

impl CoreError {
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        CoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Field names to report back to the caller, if any.
    pub fn fields(&self) -> &[String] {
        match self {
            CoreError::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(key) => CoreError::Conflict(format!("Duplicate key {}", key)),
            other => CoreError::Storage(other),
        }
    }
}

impl From<BookingError> for CoreError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(fields) => CoreError::Validation(fields),
            BookingError::InvalidTransition { .. } => CoreError::InvalidTransition(err.to_string()),
            BookingError::UnknownStatus(_) => CoreError::Validation(vec!["status".to_string()]),
            BookingError::UnknownKind(_) => CoreError::Validation(vec!["kind".to_string()]),
        }
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidFields(fields) => CoreError::Validation(fields),
            CatalogError::UnknownCategory { .. } => CoreError::Validation(vec!["category".to_string()]),
            CatalogError::UnknownKind(_) => CoreError::Validation(vec!["kind".to_string()]),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
