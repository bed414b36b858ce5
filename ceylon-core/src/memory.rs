//! In-memory repositories. Used by tests and by the API when the configured
//! database URL is `memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use ceylon_booking::{BookingRecord, BookingStatus, ComprehensiveBooking};
use ceylon_catalog::{CatalogFilter, CatalogItem, CatalogKind};

use crate::repository::{BookingFilter, BookingRepository, CatalogRepository, RepoResult, RepositoryError};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<HashMap<Uuid, CatalogItem>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn create_item(&self, item: &CatalogItem) -> RepoResult<()> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(RepositoryError::Duplicate(item.id.to_string()));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn get_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<Option<CatalogItem>> {
        let items = self.items.read().await;
        Ok(items.get(&id).filter(|item| item.kind == kind).cloned())
    }

    async fn list_items(&self, kind: CatalogKind, filter: &CatalogFilter) -> RepoResult<Vec<CatalogItem>> {
        let items = self.items.read().await;
        let mut matching: Vec<CatalogItem> = items
            .values()
            .filter(|item| item.kind == kind && filter.matches(item))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn update_item(&self, item: &CatalogItem) -> RepoResult<bool> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(existing) if existing.kind == item.kind => {
                *existing = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<bool> {
        let mut items = self.items.write().await;
        if items.get(&id).is_some_and(|item| item.kind == kind) {
            items.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn clear(&self) -> RepoResult<u64> {
        let mut items = self.items.write().await;
        let removed = items.len() as u64;
        items.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<String, BookingRecord>>,
    trips: RwLock<HashMap<String, ComprehensiveBooking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored per-category bookings.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_booking(&self, booking: &BookingRecord) -> RepoResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.reference) {
            return Err(RepositoryError::Duplicate(booking.reference.clone()));
        }
        bookings.insert(booking.reference.clone(), booking.clone());
        Ok(())
    }

    async fn get_booking(&self, reference: &str) -> RepoResult<Option<BookingRecord>> {
        Ok(self.bookings.read().await.get(reference).cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> RepoResult<Vec<BookingRecord>> {
        let bookings = self.bookings.read().await;
        let mut matching: Vec<BookingRecord> = bookings.values().filter(|b| filter.matches(b)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_booking_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut bookings = self.bookings.write().await;
        Ok(match bookings.get_mut(reference) {
            Some(booking) => {
                booking.status = status;
                booking.updated_at = updated_at;
                true
            }
            None => false,
        })
    }

    async fn delete_booking(&self, reference: &str) -> RepoResult<bool> {
        Ok(self.bookings.write().await.remove(reference).is_some())
    }

    async fn insert_trip(&self, trip: &ComprehensiveBooking) -> RepoResult<()> {
        let mut trips = self.trips.write().await;
        if trips.contains_key(&trip.reference) {
            return Err(RepositoryError::Duplicate(trip.reference.clone()));
        }
        trips.insert(trip.reference.clone(), trip.clone());
        Ok(())
    }

    async fn get_trip(&self, reference: &str) -> RepoResult<Option<ComprehensiveBooking>> {
        Ok(self.trips.read().await.get(reference).cloned())
    }

    async fn list_trips(&self) -> RepoResult<Vec<ComprehensiveBooking>> {
        let mut trips: Vec<ComprehensiveBooking> = self.trips.read().await.values().cloned().collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn update_trip_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut trips = self.trips.write().await;
        Ok(match trips.get_mut(reference) {
            Some(trip) => {
                trip.status = status;
                trip.updated_at = updated_at;
                true
            }
            None => false,
        })
    }

    async fn delete_trip(&self, reference: &str) -> RepoResult<bool> {
        Ok(self.trips.write().await.remove(reference).is_some())
    }
}
