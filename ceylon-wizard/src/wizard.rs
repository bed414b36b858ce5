use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use ceylon_booking::{BookingError, BookingStatus, ComprehensiveBookingRequest};
use ceylon_catalog::{CatalogItem, PricingEngine, TripQuote};

use crate::client::{BookingAck, BookingGateway};
use crate::draft::{BookingDraft, StepData};
use crate::step::Step;
use crate::{WizardError, MAX_LOCATIONS};

/// Wizard state. Transitions take `&self` and return the next state, so a
/// rejected transition leaves the caller's value untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Wizard {
    step: Step,
    draft: BookingDraft,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    /// Merges the current step's data and moves forward. The location step
    /// only advances with 1..=10 selections; payment stays put.
    pub fn next(&self, data: StepData) -> Result<Self, WizardError> {
        if data.step() != self.step {
            return Err(WizardError::StepMismatch { expected: self.step, got: data.step() });
        }

        let mut draft = self.draft.clone();
        draft.merge(data);

        if self.step == Step::Location {
            check_locations(&draft)?;
        }

        Ok(Self { step: self.step.forward(), draft })
    }

    pub fn back(&self) -> Self {
        Self { step: self.step.backward(), draft: self.draft.clone() }
    }

    /// Moves forward without touching the draft.
    pub fn skip(&self) -> Self {
        Self { step: self.step.forward(), draft: self.draft.clone() }
    }

    /// Payment summary over the items loaded on the earlier steps.
    pub fn quote(&self, catalog: &[CatalogItem], pricing: &PricingEngine) -> TripQuote {
        pricing.quote(catalog.iter().filter(|item| self.draft.is_selected(item)))
    }

    pub fn to_request(&self, user_id: Option<String>) -> ComprehensiveBookingRequest {
        let payment = &self.draft.payment;
        ComprehensiveBookingRequest {
            user_id,
            customer_name: payment.customer_name.trim().to_string(),
            customer_email: payment.customer_email.trim().to_string(),
            customer_phone: payment.customer_phone.trim().to_string(),
            location_ids: self.draft.locations.to_vec(),
            transport_id: self.draft.transport,
            accommodation_ids: self.draft.accommodations.to_vec(),
            activity_ids: self.draft.activities.to_vec(),
            payment: payment.details(),
            submitted_at: Some(Utc::now()),
            status: Some(BookingStatus::Pending),
            total_price: None,
        }
    }

    /// Sends the draft as one comprehensive booking.
    ///
    /// On success the returned wizard is a fresh one; on failure it is this
    /// wizard unchanged, so the traveller can retry.
    pub async fn submit(
        self,
        gateway: &dyn BookingGateway,
        user_id: Option<String>,
    ) -> (Self, Result<BookingAck, WizardError>) {
        if self.step != Step::Payment {
            return (self, Err(WizardError::NotAtPayment));
        }
        if !self.draft.payment.is_complete() {
            return (self, Err(WizardError::IncompletePayment));
        }
        // Locations can be skipped on the way here but the trip still needs one.
        if let Err(err) = check_locations(&self.draft) {
            return (self, Err(err));
        }

        let request = self.to_request(user_id);
        if let Err(BookingError::Validation(fields)) = request.check() {
            return (self, Err(WizardError::InvalidFields(fields)));
        }

        match gateway.submit(&request).await {
            Ok(ack) => {
                info!(reference = %ack.reference, total = ack.total_price, "Trip booked");
                (Self::new(), Ok(ack))
            }
            Err(err) => {
                warn!(error = %err, "Trip submission failed");
                (self, Err(WizardError::SubmissionFailed))
            }
        }
    }
}

fn check_locations(draft: &BookingDraft) -> Result<(), WizardError> {
    match draft.locations.len() {
        0 => Err(WizardError::SelectionRequired),
        n if n > MAX_LOCATIONS => Err(WizardError::TooManySelections(MAX_LOCATIONS)),
        _ => Ok(()),
    }
}
