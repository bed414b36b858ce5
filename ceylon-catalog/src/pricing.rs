use serde::{Deserialize, Serialize};

use crate::item::{CatalogItem, CatalogKind};

/// Fixed trip-length assumptions used when quoting a wizard trip.
///
/// The wizard never collects dates for transport or stays, so a quote assumes
/// `transport_days` days of transport hire and `stay_nights` nights per
/// accommodation. Per-category bookings use their own dates instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    #[serde(default = "default_trip_length")]
    pub transport_days: u32,
    #[serde(default = "default_trip_length")]
    pub stay_nights: u32,
    /// Base fee per visitor for a location visit booking.
    #[serde(default = "default_location_visit_fee")]
    pub location_visit_fee: f64,
}

fn default_trip_length() -> u32 {
    3
}

fn default_location_visit_fee() -> f64 {
    25.0
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            transport_days: default_trip_length(),
            stay_nights: default_trip_length(),
            location_visit_fee: default_location_visit_fee(),
        }
    }
}

/// Per-kind breakdown of a trip quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripQuote {
    pub transport: f64,
    pub accommodation: f64,
    pub activities: f64,
    pub total: f64,
}

pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// How many units of an item's price a trip line is charged for.
    /// Locations are free to add to a trip.
    pub fn multiplier(&self, kind: CatalogKind) -> f64 {
        match kind {
            CatalogKind::Transport => self.config.transport_days as f64,
            CatalogKind::Accommodation => self.config.stay_nights as f64,
            CatalogKind::Activity => 1.0,
            CatalogKind::Location => 0.0,
        }
    }

    pub fn line_total(&self, item: &CatalogItem) -> f64 {
        round_currency(item.price * self.multiplier(item.kind))
    }

    /// Quotes a wizard trip: `transport × days + Σ accommodation × nights + Σ activity`.
    pub fn quote<'a, I>(&self, items: I) -> TripQuote
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let mut quote = TripQuote::default();
        for item in items {
            let line = item.price * self.multiplier(item.kind);
            match item.kind {
                CatalogKind::Transport => quote.transport += line,
                CatalogKind::Accommodation => quote.accommodation += line,
                CatalogKind::Activity => quote.activities += line,
                CatalogKind::Location => {}
            }
        }
        quote.transport = round_currency(quote.transport);
        quote.accommodation = round_currency(quote.accommodation);
        quote.activities = round_currency(quote.activities);
        quote.total = round_currency(quote.transport + quote.accommodation + quote.activities);
        quote
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

/// Rounds to whole cents.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
