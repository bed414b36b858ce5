//! Client-side booking composer.
//!
//! A [`Wizard`] walks a traveller through five steps (locations, transport,
//! accommodation, activities, payment), accumulating a [`BookingDraft`] that
//! is submitted as one comprehensive booking.

pub mod step;
pub mod selection;
pub mod payment;
pub mod draft;
pub mod wizard;
pub mod view;
pub mod client;

pub use client::{BookingAck, BookingGateway, CatalogSource, ClientError, HttpBookingGateway, HttpCatalogClient};
pub use draft::{BookingDraft, StepData};
pub use payment::PaymentForm;
pub use selection::Selection;
pub use step::Step;
pub use view::StepView;
pub use wizard::Wizard;

/// Most locations a single trip may include.
pub const MAX_LOCATIONS: usize = ceylon_booking::request::MAX_LOCATIONS;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("Select at least one location to continue")]
    SelectionRequired,

    #[error("You can select up to {0} items")]
    TooManySelections(usize),

    #[error("Data for the {got} step cannot be applied at the {expected} step")]
    StepMismatch { expected: Step, got: Step },

    #[error("Bookings can only be submitted from the payment step")]
    NotAtPayment,

    #[error("Please fill in all contact and card details")]
    IncompletePayment,

    /// Fields the booking API would reject, e.g. a malformed email.
    #[error("Please check: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    /// Generic, retryable failure shown to the traveller.
    #[error("We could not submit your booking. Please try again.")]
    SubmissionFailed,
}
