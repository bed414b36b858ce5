use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ceylon_catalog::{CatalogItem, CatalogKind};

use crate::payment::PaymentForm;
use crate::selection::Selection;
use crate::step::Step;
use crate::MAX_LOCATIONS;

/// Selections accumulated across the wizard. Lives only on the client until
/// submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub locations: Selection<Uuid>,
    pub transport: Option<Uuid>,
    pub accommodations: Selection<Uuid>,
    pub activities: Selection<Uuid>,
    pub payment: PaymentForm,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            locations: Selection::with_limit(MAX_LOCATIONS),
            transport: None,
            accommodations: Selection::new(),
            activities: Selection::new(),
            payment: PaymentForm::default(),
        }
    }
}

/// What a single step hands to `Wizard::next`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepData {
    Locations(Selection<Uuid>),
    Transport(Option<Uuid>),
    Accommodations(Selection<Uuid>),
    Activities(Selection<Uuid>),
    Payment(PaymentForm),
}

impl StepData {
    pub fn step(&self) -> Step {
        match self {
            StepData::Locations(_) => Step::Location,
            StepData::Transport(_) => Step::Transport,
            StepData::Accommodations(_) => Step::Accommodation,
            StepData::Activities(_) => Step::Activity,
            StepData::Payment(_) => Step::Payment,
        }
    }
}

impl BookingDraft {
    pub(crate) fn merge(&mut self, data: StepData) {
        match data {
            StepData::Locations(locations) => self.locations = locations.capped(MAX_LOCATIONS),
            StepData::Transport(transport) => self.transport = transport,
            StepData::Accommodations(accommodations) => self.accommodations = accommodations,
            StepData::Activities(activities) => self.activities = activities,
            StepData::Payment(payment) => self.payment = payment,
        }
    }

    /// Selects or deselects the transport provider. At most one is kept.
    pub fn toggle_transport(&mut self, id: Uuid) -> bool {
        if self.transport == Some(id) {
            self.transport = None;
            false
        } else {
            self.transport = Some(id);
            true
        }
    }

    pub fn is_selected(&self, item: &CatalogItem) -> bool {
        match item.kind {
            CatalogKind::Location => self.locations.contains(&item.id),
            CatalogKind::Transport => self.transport == Some(item.id),
            CatalogKind::Accommodation => self.accommodations.contains(&item.id),
            CatalogKind::Activity => self.activities.contains(&item.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_limit_applies_by_default() {
        let mut draft = BookingDraft::default();
        for _ in 0..MAX_LOCATIONS {
            draft.locations.toggle(Uuid::new_v4()).unwrap();
        }
        assert!(draft.locations.toggle(Uuid::new_v4()).is_err());
        assert_eq!(draft.locations.len(), MAX_LOCATIONS);
        assert_eq!(draft.accommodations.limit(), None);
    }

    #[test]
    fn test_merged_locations_keep_the_cap() {
        let mut unbounded = Selection::new();
        for _ in 0..3 {
            unbounded.toggle(Uuid::new_v4()).unwrap();
        }
        let mut draft = BookingDraft::default();
        draft.merge(StepData::Locations(unbounded));
        assert_eq!(draft.locations.limit(), Some(MAX_LOCATIONS));

        for _ in 3..MAX_LOCATIONS {
            draft.locations.toggle(Uuid::new_v4()).unwrap();
        }
        assert_eq!(
            draft.locations.toggle(Uuid::new_v4()),
            Err(crate::WizardError::TooManySelections(MAX_LOCATIONS))
        );
    }

    #[test]
    fn test_single_transport() {
        let mut draft = BookingDraft::default();
        let (van, car) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(draft.toggle_transport(van));
        assert!(draft.toggle_transport(car));
        assert_eq!(draft.transport, Some(car));
        assert!(!draft.toggle_transport(car));
        assert_eq!(draft.transport, None);
    }
}
