use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use ceylon_booking::{BookingKind, BookingRecord, BookingStatus, ComprehensiveBooking};
use ceylon_catalog::{CatalogFilter, CatalogItem, CatalogKind};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write (e.g. a booking reference collision).
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Storage backend: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Admin list filter for per-category bookings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingFilter {
    pub kind: Option<BookingKind>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &BookingRecord) -> bool {
        self.kind.map_or(true, |kind| booking.kind == kind)
            && self.status.map_or(true, |status| booking.status == status)
    }
}

/// Repository trait for the four catalog collections
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_item(&self, item: &CatalogItem) -> RepoResult<()>;

    async fn get_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<Option<CatalogItem>>;

    async fn list_items(&self, kind: CatalogKind, filter: &CatalogFilter) -> RepoResult<Vec<CatalogItem>>;

    /// Returns `false` when no item with that id exists.
    async fn update_item(&self, item: &CatalogItem) -> RepoResult<bool>;

    async fn delete_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<bool>;

    /// Removes every catalog item of every kind. Used by the seed tool.
    async fn clear(&self) -> RepoResult<u64>;
}

/// Repository trait for booking records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert_booking(&self, booking: &BookingRecord) -> RepoResult<()>;

    async fn get_booking(&self, reference: &str) -> RepoResult<Option<BookingRecord>>;

    async fn list_bookings(&self, filter: &BookingFilter) -> RepoResult<Vec<BookingRecord>>;

    async fn update_booking_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool>;

    async fn delete_booking(&self, reference: &str) -> RepoResult<bool>;

    async fn insert_trip(&self, trip: &ComprehensiveBooking) -> RepoResult<()>;

    async fn get_trip(&self, reference: &str) -> RepoResult<Option<ComprehensiveBooking>>;

    async fn list_trips(&self) -> RepoResult<Vec<ComprehensiveBooking>>;

    async fn update_trip_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool>;

    async fn delete_trip(&self, reference: &str) -> RepoResult<bool>;
}
