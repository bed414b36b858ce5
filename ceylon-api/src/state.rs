use std::sync::Arc;

use ceylon_booking::{PdfReceiptRenderer, ReceiptRenderer};
use ceylon_catalog::{PricingConfig, PricingEngine};
use ceylon_core::{BookingRepository, BookingService, CatalogRepository, CatalogService};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub bookings: BookingService,
    pub receipts: Arc<dyn ReceiptRenderer>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        catalog_repo: Arc<dyn CatalogRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        pricing: PricingConfig,
        auth: AuthConfig,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog_repo.clone()),
            bookings: BookingService::new(catalog_repo, booking_repo, PricingEngine::new(pricing)),
            receipts: Arc::new(PdfReceiptRenderer::default()),
            auth,
        }
    }
}
