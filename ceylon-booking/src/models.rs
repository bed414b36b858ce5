use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use ceylon_catalog::{CatalogItem, CatalogKind, PricingConfig};
use ceylon_shared::Masked;

use crate::BookingError;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookingError::UnknownStatus(other.to_string())),
        }
    }
}

/// Which catalog a per-category booking points at. Each variant carries its
/// own reference prefix, scheduling shape and price formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Transport,
    Accommodation,
    Location,
    Activity,
}

impl BookingKind {
    pub const ALL: [BookingKind; 4] = [
        BookingKind::Transport,
        BookingKind::Accommodation,
        BookingKind::Location,
        BookingKind::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::Transport => "transport",
            BookingKind::Accommodation => "accommodation",
            BookingKind::Location => "location",
            BookingKind::Activity => "activity",
        }
    }

    pub fn catalog_kind(&self) -> CatalogKind {
        match self {
            BookingKind::Transport => CatalogKind::Transport,
            BookingKind::Accommodation => CatalogKind::Accommodation,
            BookingKind::Location => CatalogKind::Location,
            BookingKind::Activity => CatalogKind::Activity,
        }
    }

    pub fn reference_prefix(&self) -> &'static str {
        match self {
            BookingKind::Transport => "CEY",
            BookingKind::Accommodation => "ACY",
            BookingKind::Location => "LCY",
            BookingKind::Activity => "ATY",
        }
    }

    /// Only transport providers are checked for availability at booking time.
    pub fn requires_availability(&self) -> bool {
        matches!(self, BookingKind::Transport)
    }

    pub fn quantity_label(&self) -> &'static str {
        match self {
            BookingKind::Transport => "passengers",
            BookingKind::Accommodation => "guests",
            BookingKind::Location => "group_size",
            BookingKind::Activity => "participants",
        }
    }

    /// Price charged per unit for this booking. Location visits are billed
    /// a flat visitor fee whatever the catalog price says.
    pub fn unit_price(&self, item: &CatalogItem, pricing: &PricingConfig) -> f64 {
        match self {
            BookingKind::Location => pricing.location_visit_fee,
            _ => item.price,
        }
    }

    /// Number of units the unit price is charged for.
    pub fn billable_units(&self, schedule: &Schedule, quantity: u32) -> u32 {
        match self {
            BookingKind::Accommodation => schedule.nights(),
            _ => quantity,
        }
    }
}

impl fmt::Display for BookingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingKind {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BookingError::UnknownKind(s.to_string()))
    }
}

/// Customer contact captured per booking. Not a standalone identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    SingleDate { date: NaiveDate },
    DateRange { check_in: NaiveDate, check_out: NaiveDate },
}

impl Schedule {
    /// Nights covered by a date range; single-date schedules count as one.
    pub fn nights(&self) -> u32 {
        match self {
            Schedule::SingleDate { .. } => 1,
            Schedule::DateRange { check_in, check_out } => {
                (*check_out - *check_in).num_days().max(0) as u32
            }
        }
    }

    pub fn starts_on(&self) -> NaiveDate {
        match self {
            Schedule::SingleDate { date } => *date,
            Schedule::DateRange { check_in, .. } => *check_in,
        }
    }
}

/// A persisted, priced reservation of a single catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub id: Uuid,
    pub reference: String,
    pub kind: BookingKind,
    pub item_id: Uuid,
    /// Snapshot of the catalog item at booking time.
    pub item_name: String,
    pub item_category: String,
    pub customer: Customer,
    pub schedule: Schedule,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn update_status(&mut self, next: BookingStatus) -> Result<(), BookingError> {
        self.status = crate::lifecycle::transition(self.status, next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// One selected catalog item inside a comprehensive booking, priced and
/// snapshotted at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingLeg {
    pub kind: CatalogKind,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_category: String,
    pub unit_price: f64,
    pub multiplier: f64,
    pub line_total: f64,
}

/// Card data from the wizard's payment step. Stored as opaque strings; no
/// gateway is involved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentDetails {
    pub cardholder_name: String,
    pub card_number: Masked<String>,
    pub expiry: Masked<String>,
    pub cvv: Masked<String>,
}

impl PaymentDetails {
    pub fn is_complete(&self) -> bool {
        !self.cardholder_name.trim().is_empty()
            && !self.card_number.is_blank()
            && !self.expiry.is_blank()
            && !self.cvv.is_blank()
    }
}

/// A single submission bundling every wizard step plus payment data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComprehensiveBooking {
    pub id: Uuid,
    pub reference: String,
    pub user_id: Option<String>,
    pub customer: Customer,
    pub legs: Vec<BookingLeg>,
    pub payment: PaymentDetails,
    pub total_price: f64,
    pub status: BookingStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComprehensiveBooking {
    pub const REFERENCE_PREFIX: &'static str = "CBY";

    pub fn update_status(&mut self, next: BookingStatus) -> Result<(), BookingError> {
        self.status = crate::lifecycle::transition(self.status, next)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn legs_of(&self, kind: CatalogKind) -> impl Iterator<Item = &BookingLeg> {
        self.legs.iter().filter(move |leg| leg.kind == kind)
    }
}
