use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use ceylon_booking::reference::generate_reference;
use ceylon_booking::{
    BookingKind, BookingLeg, BookingRecord, BookingStatus, CategoryBookingRequest,
    ComprehensiveBooking, ComprehensiveBookingRequest, Receipt,
};
use ceylon_catalog::pricing::round_currency;
use ceylon_catalog::{CatalogFilter, CatalogItem, CatalogItemPatch, CatalogKind, NewCatalogItem, PricingEngine};

use crate::repository::{BookingFilter, BookingRepository, CatalogRepository};
use crate::{CoreError, CoreResult};

/// Administrative CRUD over the catalog collections.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, kind: CatalogKind, filter: &CatalogFilter) -> CoreResult<Vec<CatalogItem>> {
        Ok(self.repo.list_items(kind, filter).await?)
    }

    pub async fn get(&self, kind: CatalogKind, id: Uuid) -> CoreResult<CatalogItem> {
        self.repo
            .get_item(kind, id)
            .await?
            .ok_or_else(|| CoreError::not_found(kind.as_str(), id))
    }

    pub async fn create(&self, kind: CatalogKind, input: NewCatalogItem) -> CoreResult<CatalogItem> {
        let item = CatalogItem::new(kind, input)?;
        self.repo.create_item(&item).await?;
        info!(kind = %kind, id = %item.id, "Catalog item created: {}", item.name);
        Ok(item)
    }

    pub async fn update(&self, kind: CatalogKind, id: Uuid, patch: CatalogItemPatch) -> CoreResult<CatalogItem> {
        let mut item = self.get(kind, id).await?;
        item.apply(patch)?;
        if !self.repo.update_item(&item).await? {
            return Err(CoreError::not_found(kind.as_str(), id));
        }
        Ok(item)
    }

    pub async fn delete(&self, kind: CatalogKind, id: Uuid) -> CoreResult<()> {
        if self.repo.delete_item(kind, id).await? {
            info!(kind = %kind, id = %id, "Catalog item deleted");
            Ok(())
        } else {
            Err(CoreError::not_found(kind.as_str(), id))
        }
    }
}

/// Server-side booking composition: validates a submission, looks up the
/// referenced catalog items, prices them from current catalog data,
/// snapshots them and persists a pending booking.
#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
    pricing: Arc<PricingEngine>,
}

impl BookingService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
        pricing: PricingEngine,
    ) -> Self {
        Self {
            catalog,
            bookings,
            pricing: Arc::new(pricing),
        }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Creates a single-item booking of `kind`.
    ///
    /// Any client-submitted total is ignored. Nothing is persisted when
    /// validation, lookup or the availability check fails.
    pub async fn create_booking(
        &self,
        kind: BookingKind,
        request: CategoryBookingRequest,
        user_id: Option<String>,
    ) -> CoreResult<BookingRecord> {
        let order = request.into_order(kind)?;

        let item = self
            .catalog
            .get_item(kind.catalog_kind(), order.item_id)
            .await?
            .ok_or_else(|| CoreError::not_found(kind.as_str(), order.item_id))?;

        if kind.requires_availability() && !item.available {
            warn!(item_id = %item.id, "Rejected {} booking: {} is unavailable", kind, item.name);
            return Err(CoreError::Unavailable(format!("{} is not available", item.name)));
        }

        let unit_price = kind.unit_price(&item, self.pricing.config());
        let units = kind.billable_units(&order.schedule, order.quantity);
        let total_price = round_currency(unit_price * units as f64);

        let now = Utc::now();
        let booking = BookingRecord {
            id: Uuid::new_v4(),
            reference: generate_reference(kind.reference_prefix()),
            kind,
            item_id: item.id,
            item_name: item.name,
            item_category: item.category,
            customer: order.customer,
            schedule: order.schedule,
            quantity: order.quantity,
            unit_price,
            total_price,
            status: BookingStatus::Pending,
            special_requests: order.special_requests,
            user_id,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert_booking(&booking).await?;
        info!(
            reference = %booking.reference,
            kind = %kind,
            total = booking.total_price,
            "Booking created"
        );
        Ok(booking)
    }

    /// Creates the multi-leg booking submitted by the wizard. The trip is
    /// stored as one record, so it is persisted entirely or not at all.
    pub async fn create_trip(
        &self,
        request: ComprehensiveBookingRequest,
        user_id: Option<String>,
    ) -> CoreResult<ComprehensiveBooking> {
        request.check()?;

        let mut selections: Vec<(CatalogKind, Uuid)> = Vec::new();
        selections.extend(dedup(&request.location_ids).map(|id| (CatalogKind::Location, id)));
        selections.extend(request.transport_id.map(|id| (CatalogKind::Transport, id)));
        selections.extend(dedup(&request.accommodation_ids).map(|id| (CatalogKind::Accommodation, id)));
        selections.extend(dedup(&request.activity_ids).map(|id| (CatalogKind::Activity, id)));

        let mut items = Vec::with_capacity(selections.len());
        for (kind, id) in selections {
            let item = self
                .catalog
                .get_item(kind, id)
                .await?
                .ok_or_else(|| CoreError::not_found(kind.as_str(), id))?;
            if !item.available {
                return Err(CoreError::Unavailable(format!("{} is not available", item.name)));
            }
            items.push(item);
        }

        let quote = self.pricing.quote(&items);
        let legs = items
            .iter()
            .map(|item| BookingLeg {
                kind: item.kind,
                item_id: item.id,
                item_name: item.name.clone(),
                item_category: item.category.clone(),
                unit_price: item.price,
                multiplier: self.pricing.multiplier(item.kind),
                line_total: self.pricing.line_total(item),
            })
            .collect();

        let now = Utc::now();
        let trip = ComprehensiveBooking {
            id: Uuid::new_v4(),
            reference: generate_reference(ComprehensiveBooking::REFERENCE_PREFIX),
            // A verified token wins over whatever the body claims.
            user_id: user_id.or(request.user_id.clone()),
            customer: request.customer(),
            legs,
            payment: request.payment,
            total_price: quote.total,
            status: BookingStatus::Pending,
            submitted_at: request.submitted_at,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert_trip(&trip).await?;
        info!(
            reference = %trip.reference,
            legs = trip.legs.len(),
            total = trip.total_price,
            "Comprehensive booking created"
        );
        Ok(trip)
    }

    pub async fn get_booking(&self, reference: &str) -> CoreResult<BookingRecord> {
        self.bookings
            .get_booking(reference)
            .await?
            .ok_or_else(|| CoreError::not_found("booking", reference))
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> CoreResult<Vec<BookingRecord>> {
        Ok(self.bookings.list_bookings(filter).await?)
    }

    pub async fn update_booking_status(&self, reference: &str, status: BookingStatus) -> CoreResult<BookingRecord> {
        let mut booking = self.get_booking(reference).await?;
        let previous = booking.status;
        booking.update_status(status)?;
        if !self
            .bookings
            .update_booking_status(reference, booking.status, booking.updated_at)
            .await?
        {
            return Err(CoreError::not_found("booking", reference));
        }
        info!(reference = %reference, "Booking status {} -> {}", previous, booking.status);
        Ok(booking)
    }

    pub async fn delete_booking(&self, reference: &str) -> CoreResult<()> {
        if self.bookings.delete_booking(reference).await? {
            info!(reference = %reference, "Booking deleted");
            Ok(())
        } else {
            Err(CoreError::not_found("booking", reference))
        }
    }

    pub async fn get_trip(&self, reference: &str) -> CoreResult<ComprehensiveBooking> {
        self.bookings
            .get_trip(reference)
            .await?
            .ok_or_else(|| CoreError::not_found("comprehensive booking", reference))
    }

    pub async fn list_trips(&self) -> CoreResult<Vec<ComprehensiveBooking>> {
        Ok(self.bookings.list_trips().await?)
    }

    pub async fn update_trip_status(&self, reference: &str, status: BookingStatus) -> CoreResult<ComprehensiveBooking> {
        let mut trip = self.get_trip(reference).await?;
        let previous = trip.status;
        trip.update_status(status)?;
        if !self
            .bookings
            .update_trip_status(reference, trip.status, trip.updated_at)
            .await?
        {
            return Err(CoreError::not_found("comprehensive booking", reference));
        }
        info!(reference = %reference, "Comprehensive booking status {} -> {}", previous, trip.status);
        Ok(trip)
    }

    pub async fn delete_trip(&self, reference: &str) -> CoreResult<()> {
        if self.bookings.delete_trip(reference).await? {
            info!(reference = %reference, "Comprehensive booking deleted");
            Ok(())
        } else {
            Err(CoreError::not_found("comprehensive booking", reference))
        }
    }

    pub async fn booking_receipt(&self, reference: &str) -> CoreResult<Receipt> {
        Ok(Receipt::for_booking(&self.get_booking(reference).await?))
    }

    pub async fn trip_receipt(&self, reference: &str) -> CoreResult<Receipt> {
        Ok(Receipt::for_trip(&self.get_trip(reference).await?))
    }
}

fn dedup(ids: &[Uuid]) -> impl Iterator<Item = Uuid> + '_ {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(move |id| seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryBookingRepository, InMemoryCatalogRepository};
    use ceylon_booking::reference::is_valid_reference;
    use ceylon_booking::{PaymentDetails, Schedule};
    use ceylon_catalog::PricingConfig;
    use serde_json::json;

    struct Fixture {
        catalog: Arc<InMemoryCatalogRepository>,
        bookings: Arc<InMemoryBookingRepository>,
        service: BookingService,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let service = BookingService::new(
            catalog.clone(),
            bookings.clone(),
            PricingEngine::new(PricingConfig::default()),
        );
        Fixture { catalog, bookings, service }
    }

    async fn add(catalog: &InMemoryCatalogRepository, kind: CatalogKind, category: &str, price: f64, available: bool) -> CatalogItem {
        let item = CatalogItem::new(
            kind,
            NewCatalogItem {
                name: format!("{kind} {category}"),
                category: category.to_string(),
                price: Some(price),
                available: Some(available),
                ..Default::default()
            },
        )
        .unwrap();
        catalog.create_item(&item).await.unwrap();
        item
    }

    fn request(item_id: Uuid, extra: serde_json::Value) -> CategoryBookingRequest {
        let mut body = json!({
            "item_id": item_id,
            "customer_name": "Nimal Perera",
            "customer_email": "nimal@example.com",
            "customer_phone": "0771234567",
            "date": "2026-12-20",
            "quantity": 2,
            "total_price": 1.0
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_price_formulas_per_kind() {
        let f = fixture();
        let van = add(&f.catalog, CatalogKind::Transport, "van", 80.0, true).await;
        let hotel = add(&f.catalog, CatalogKind::Accommodation, "hotel", 100.0, true).await;
        let fort = add(&f.catalog, CatalogKind::Location, "historical", 0.0, true).await;
        let safari = add(&f.catalog, CatalogKind::Activity, "wildlife", 45.0, true).await;

        let transport = f.service.create_booking(BookingKind::Transport, request(van.id, json!({})), None).await.unwrap();
        assert_eq!(transport.total_price, 160.0);

        let stay = f
            .service
            .create_booking(
                BookingKind::Accommodation,
                request(hotel.id, json!({"check_in": "2026-12-20", "check_out": "2026-12-23"})),
                None,
            )
            .await
            .unwrap();
        assert_eq!(stay.total_price, 300.0);
        assert!(matches!(stay.schedule, Schedule::DateRange { .. }));

        let visit = f.service.create_booking(BookingKind::Location, request(fort.id, json!({"quantity": 4})), None).await.unwrap();
        assert_eq!(visit.unit_price, 25.0);
        assert_eq!(visit.total_price, 100.0);

        let tour = f.service.create_booking(BookingKind::Activity, request(safari.id, json!({})), None).await.unwrap();
        assert_eq!(tour.total_price, 90.0);

        for booking in [&transport, &stay, &visit, &tour] {
            assert_eq!(booking.status, BookingStatus::Pending);
            assert!(is_valid_reference(&booking.reference, booking.kind.reference_prefix()));
        }
        assert_eq!(f.bookings.len().await, 4);
    }

    #[tokio::test]
    async fn test_unavailable_transport_persists_nothing() {
        let f = fixture();
        let van = add(&f.catalog, CatalogKind::Transport, "van", 80.0, false).await;

        let err = f
            .service
            .create_booking(BookingKind::Transport, request(van.id, json!({})), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unavailable(_)));
        assert_eq!(f.bookings.len().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_item_persists_nothing() {
        let f = fixture();
        for kind in BookingKind::ALL {
            let err = f
                .service
                .create_booking(
                    kind,
                    request(Uuid::new_v4(), json!({"check_in": "2026-12-20", "check_out": "2026-12-21"})),
                    None,
                )
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::NotFound { .. }), "{kind}: {err:?}");
        }
        assert_eq!(f.bookings.len().await, 0);
    }

    #[tokio::test]
    async fn test_item_of_other_kind_is_not_found() {
        let f = fixture();
        let hotel = add(&f.catalog, CatalogKind::Accommodation, "hotel", 100.0, true).await;
        let err = f
            .service
            .create_booking(BookingKind::Activity, request(hotel.id, json!({})), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_change() {
        let f = fixture();
        let safari = add(&f.catalog, CatalogKind::Activity, "wildlife", 45.0, true).await;
        let booking = f.service.create_booking(BookingKind::Activity, request(safari.id, json!({})), None).await.unwrap();

        let mut renamed = safari.clone();
        renamed.apply(CatalogItemPatch { name: Some("Yala Sunrise".to_string()), price: Some(99.0), ..Default::default() }).unwrap();
        f.catalog.update_item(&renamed).await.unwrap();

        let stored = f.service.get_booking(&booking.reference).await.unwrap();
        assert_eq!(stored.item_name, safari.name);
        assert_eq!(stored.total_price, 90.0);
    }

    #[tokio::test]
    async fn test_trip_total_recomputed() {
        let f = fixture();
        let beach = add(&f.catalog, CatalogKind::Location, "beach", 0.0, true).await;
        let van = add(&f.catalog, CatalogKind::Transport, "van", 80.0, true).await;
        let hotel = add(&f.catalog, CatalogKind::Accommodation, "hotel", 100.0, true).await;
        let villa = add(&f.catalog, CatalogKind::Accommodation, "villa", 120.0, true).await;
        let safari = add(&f.catalog, CatalogKind::Activity, "wildlife", 45.0, true).await;
        let temple = add(&f.catalog, CatalogKind::Activity, "cultural", 0.0, true).await;

        let request = ComprehensiveBookingRequest {
            user_id: Some("body-user".to_string()),
            customer_name: "Nimal Perera".to_string(),
            customer_email: "nimal@example.com".to_string(),
            customer_phone: "0771234567".to_string(),
            location_ids: vec![beach.id, beach.id],
            transport_id: Some(van.id),
            accommodation_ids: vec![hotel.id, villa.id],
            activity_ids: vec![safari.id, temple.id],
            payment: PaymentDetails {
                cardholder_name: "N Perera".to_string(),
                card_number: "4242 4242 4242 4242".into(),
                expiry: "12/28".into(),
                cvv: "123".into(),
            },
            total_price: Some(1.0),
            ..Default::default()
        };

        let trip = f.service.create_trip(request, Some("token-user".to_string())).await.unwrap();
        assert_eq!(trip.total_price, 945.0);
        assert_eq!(trip.legs.len(), 6);
        assert_eq!(trip.user_id.as_deref(), Some("token-user"));
        assert_eq!(trip.status, BookingStatus::Pending);
        assert!(is_valid_reference(&trip.reference, "CBY"));
    }

    #[tokio::test]
    async fn test_trip_with_missing_item_persists_nothing() {
        let f = fixture();
        let beach = add(&f.catalog, CatalogKind::Location, "beach", 0.0, true).await;
        let request = ComprehensiveBookingRequest {
            customer_name: "Nimal Perera".to_string(),
            customer_email: "nimal@example.com".to_string(),
            customer_phone: "0771234567".to_string(),
            location_ids: vec![beach.id],
            activity_ids: vec![Uuid::new_v4()],
            ..Default::default()
        };
        let err = f.service.create_trip(request, None).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(f.service.list_trips().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_updates() {
        let f = fixture();
        let safari = add(&f.catalog, CatalogKind::Activity, "wildlife", 45.0, true).await;
        let booking = f.service.create_booking(BookingKind::Activity, request(safari.id, json!({})), None).await.unwrap();

        let confirmed = f.service.update_booking_status(&booking.reference, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        f.service.update_booking_status(&booking.reference, BookingStatus::Cancelled).await.unwrap();

        let err = f
            .service
            .update_booking_status(&booking.reference, BookingStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition(_)));
        assert_eq!(f.service.get_booking(&booking.reference).await.unwrap().status, BookingStatus::Cancelled);

        f.service.delete_booking(&booking.reference).await.unwrap();
        assert!(matches!(
            f.service.get_booking(&booking.reference).await,
            Err(CoreError::NotFound { .. })
        ));
    }
}
