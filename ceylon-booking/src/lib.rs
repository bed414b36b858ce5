pub mod models;
pub mod lifecycle;
pub mod reference;
pub mod request;
pub mod receipt;

pub use models::{
    BookingKind, BookingLeg, BookingRecord, BookingStatus, ComprehensiveBooking, Customer,
    PaymentDetails, Schedule,
};
pub use request::{BookingOrder, CategoryBookingRequest, ComprehensiveBookingRequest};
pub use receipt::{PdfReceiptRenderer, Receipt, ReceiptRenderer};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid or missing fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("Unknown booking kind: {0}")]
    UnknownKind(String),
}
