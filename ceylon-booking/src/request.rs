use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ceylon_shared::invalid_fields;

use crate::models::{BookingKind, BookingStatus, Customer, PaymentDetails, Schedule};
use crate::BookingError;

pub const MAX_LOCATIONS: usize = 10;

/// Body of `POST /v1/bookings/{kind}`.
///
/// The four category forms share one shape; the per-category field names
/// (`provider_id`, `guests`, `visit_date`...) are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryBookingRequest {
    #[serde(alias = "provider_id", alias = "accommodation_id", alias = "location_id", alias = "activity_id")]
    #[validate(required)]
    pub item_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[serde(default)]
    #[validate(email)]
    pub customer_email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub customer_phone: String,
    #[serde(alias = "travel_date", alias = "visit_date", alias = "activity_date")]
    pub date: Option<NaiveDate>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[serde(alias = "passengers", alias = "guests", alias = "group_size", alias = "participants")]
    #[validate(required, range(min = 1))]
    pub quantity: Option<u32>,
    pub special_requests: Option<String>,
    /// Ignored: totals are always computed server-side.
    pub total_price: Option<f64>,
}

/// A category booking request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingOrder {
    pub kind: BookingKind,
    pub item_id: Uuid,
    pub customer: Customer,
    pub schedule: Schedule,
    pub quantity: u32,
    pub special_requests: Option<String>,
}

impl CategoryBookingRequest {
    /// Checks required fields for `kind` and collects every missing or
    /// malformed field name into one error.
    pub fn into_order(self, kind: BookingKind) -> Result<BookingOrder, BookingError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => invalid_fields(&errors),
        };

        let schedule = match kind {
            BookingKind::Accommodation => match (self.check_in, self.check_out) {
                (Some(check_in), Some(check_out)) if check_out > check_in => {
                    Some(Schedule::DateRange { check_in, check_out })
                }
                (Some(_), Some(_)) => {
                    fields.push("check_out".to_string());
                    None
                }
                (check_in, check_out) => {
                    if check_in.is_none() {
                        fields.push("check_in".to_string());
                    }
                    if check_out.is_none() {
                        fields.push("check_out".to_string());
                    }
                    None
                }
            },
            _ => match self.date {
                Some(date) => Some(Schedule::SingleDate { date }),
                None => {
                    fields.push("date".to_string());
                    None
                }
            },
        };

        match (self.item_id, schedule, self.quantity) {
            (Some(item_id), Some(schedule), Some(quantity)) if fields.is_empty() => Ok(BookingOrder {
                kind,
                item_id,
                customer: Customer {
                    name: self.customer_name.trim().to_string(),
                    email: self.customer_email.trim().to_string().into(),
                    phone: self.customer_phone.trim().to_string().into(),
                },
                schedule,
                quantity,
                special_requests: self.special_requests.filter(|s| !s.trim().is_empty()),
            }),
            _ => {
                fields.sort();
                fields.dedup();
                Err(BookingError::Validation(fields))
            }
        }
    }
}

/// Body of `POST /v1/bookings/comprehensive`, as composed by the wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ComprehensiveBookingRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[serde(default)]
    #[validate(email)]
    pub customer_email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub customer_phone: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 10))]
    pub location_ids: Vec<Uuid>,
    pub transport_id: Option<Uuid>,
    #[serde(default)]
    pub accommodation_ids: Vec<Uuid>,
    #[serde(default)]
    pub activity_ids: Vec<Uuid>,
    #[serde(default)]
    pub payment: PaymentDetails,
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    /// Ignored: totals are always computed server-side.
    pub total_price: Option<f64>,
}

impl ComprehensiveBookingRequest {
    pub fn check(&self) -> Result<(), BookingError> {
        self.validate()
            .map_err(|errors| BookingError::Validation(invalid_fields(&errors)))
    }

    pub fn customer(&self) -> Customer {
        Customer {
            name: self.customer_name.trim().to_string(),
            email: self.customer_email.trim().to_string().into(),
            phone: self.customer_phone.trim().to_string().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport_json() -> serde_json::Value {
        json!({
            "provider_id": "6f1c1d1e-8f3a-4d8e-9a43-0d2c5c0b7a11",
            "customer_name": "Nimal Perera",
            "customer_email": "nimal@example.com",
            "customer_phone": "+94 77 123 4567",
            "travel_date": "2026-12-20",
            "passengers": 3
        })
    }

    #[test]
    fn test_category_aliases() {
        let req: CategoryBookingRequest = serde_json::from_value(transport_json()).unwrap();
        let order = req.into_order(BookingKind::Transport).unwrap();
        assert_eq!(order.quantity, 3);
        assert_eq!(order.customer.email.expose(), "nimal@example.com");
        assert!(matches!(order.schedule, Schedule::SingleDate { .. }));
    }

    #[test]
    fn test_missing_fields_listed() {
        let req: CategoryBookingRequest = serde_json::from_value(json!({
            "customer_name": "Nimal Perera",
            "customer_email": "nimal@example.com"
        }))
        .unwrap();
        let err = req.into_order(BookingKind::Activity).unwrap_err();
        match err {
            BookingError::Validation(fields) => {
                assert_eq!(fields, vec!["customer_phone", "date", "item_id", "quantity"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accommodation_needs_forward_range() {
        let mut body = transport_json();
        body["check_in"] = json!("2026-12-20");
        body["check_out"] = json!("2026-12-20");
        let req: CategoryBookingRequest = serde_json::from_value(body).unwrap();
        let err = req.into_order(BookingKind::Accommodation).unwrap_err();
        assert!(matches!(err, BookingError::Validation(fields) if fields == vec!["check_out"]));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut body = transport_json();
        body["passengers"] = json!(0);
        let req: CategoryBookingRequest = serde_json::from_value(body).unwrap();
        let err = req.into_order(BookingKind::Transport).unwrap_err();
        assert!(matches!(err, BookingError::Validation(fields) if fields == vec!["quantity"]));
    }

    #[test]
    fn test_comprehensive_requires_locations() {
        let req = ComprehensiveBookingRequest {
            customer_name: "Nimal".to_string(),
            customer_email: "nimal@example.com".to_string(),
            customer_phone: "0771234567".to_string(),
            ..Default::default()
        };
        let err = req.check().unwrap_err();
        assert!(matches!(err, BookingError::Validation(fields) if fields == vec!["location_ids"]));
    }
}
