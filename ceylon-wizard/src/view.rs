use serde::Serialize;
use tracing::warn;

use ceylon_catalog::CatalogItem;

use crate::client::CatalogSource;
use crate::step::Step;

/// What a step shows while its catalog list loads.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepView {
    #[default]
    Loading,
    Ready { items: Vec<CatalogItem> },
    /// Retryable: activating the step again refetches.
    Failed { message: String },
}

impl StepView {
    pub fn is_loading(&self) -> bool {
        matches!(self, StepView::Loading)
    }

    pub fn items(&self) -> &[CatalogItem] {
        match self {
            StepView::Ready { items } => items,
            _ => &[],
        }
    }
}

/// Loads the unfiltered catalog list for `step`. Every step reports a fetch
/// failure the same way.
pub async fn activate(step: Step, source: &dyn CatalogSource) -> StepView {
    let Some(kind) = step.catalog_kind() else {
        return StepView::Ready { items: Vec::new() };
    };

    match source.list(kind).await {
        Ok(items) => StepView::Ready { items },
        Err(err) => {
            warn!(step = %step, error = %err, "Catalog fetch failed");
            StepView::Failed {
                message: format!("Could not load {}. Please try again.", kind.resource()),
            }
        }
    }
}
