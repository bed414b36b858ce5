use serde::{Deserialize, Serialize};

use crate::WizardError;

/// Ordered set of selected ids with an optional size cap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection<T> {
    items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl<T: PartialEq + Clone> Selection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), limit: None }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { items: Vec::new(), limit: Some(limit) }
    }

    /// Selects `item`, or deselects it when already selected.
    ///
    /// Returns whether the item is selected afterwards. Adding past the
    /// limit is refused and leaves the selection untouched.
    pub fn toggle(&mut self, item: T) -> Result<bool, WizardError> {
        if let Some(pos) = self.items.iter().position(|existing| *existing == item) {
            self.items.remove(pos);
            return Ok(false);
        }
        if let Some(limit) = self.limit {
            if self.items.len() >= limit {
                return Err(WizardError::TooManySelections(limit));
            }
        }
        self.items.push(item);
        Ok(true)
    }

    /// Applies `limit` to later toggles. Items already selected are kept even
    /// when they exceed it.
    pub fn capped(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
