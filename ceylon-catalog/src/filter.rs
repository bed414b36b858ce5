use serde::{Deserialize, Serialize};

use crate::item::CatalogItem;

/// Optional list filters accepted by every catalog collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on the item name.
    pub name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub max_price: Option<f64>,
    pub available: Option<bool>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            if !item.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(city) = &self.city {
            match &item.city {
                Some(item_city) if item_city.eq_ignore_ascii_case(city) => {}
                _ => return false,
            }
        }
        if let Some(max_price) = self.max_price {
            if item.price > max_price {
                return false;
            }
        }
        if let Some(available) = self.available {
            if item.available != available {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CatalogKind, NewCatalogItem};

    fn activity(name: &str, category: &str, price: f64, city: &str) -> CatalogItem {
        CatalogItem::new(
            CatalogKind::Activity,
            NewCatalogItem {
                name: name.to_string(),
                category: category.to_string(),
                price: Some(price),
                city: Some(city.to_string()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&activity("Whale Watching", "wildlife", 45.0, "Mirissa")));
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let filter = CatalogFilter { name: Some("whale".to_string()), ..Default::default() };
        assert!(filter.matches(&activity("Whale Watching", "wildlife", 45.0, "Mirissa")));
        assert!(!filter.matches(&activity("Surf Lesson", "water_sports", 30.0, "Arugam Bay")));
    }

    #[test]
    fn test_combined_filters() {
        let filter = CatalogFilter {
            category: Some("wildlife".to_string()),
            city: Some("mirissa".to_string()),
            max_price: Some(50.0),
            ..Default::default()
        };
        assert!(filter.matches(&activity("Whale Watching", "wildlife", 45.0, "Mirissa")));
        assert!(!filter.matches(&activity("Whale Watching Deluxe", "wildlife", 95.0, "Mirissa")));
        assert!(!filter.matches(&activity("Safari", "wildlife", 40.0, "Yala")));
    }
}
