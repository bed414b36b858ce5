use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use ceylon_shared::invalid_fields;

/// The four independent catalog collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Location,
    Accommodation,
    Activity,
    Transport,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Location,
        CatalogKind::Accommodation,
        CatalogKind::Activity,
        CatalogKind::Transport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Location => "location",
            CatalogKind::Accommodation => "accommodation",
            CatalogKind::Activity => "activity",
            CatalogKind::Transport => "transport",
        }
    }

    /// Path segment used by the REST API (`/v1/{resource}`).
    pub fn resource(&self) -> &'static str {
        match self {
            CatalogKind::Location => "locations",
            CatalogKind::Accommodation => "accommodations",
            CatalogKind::Activity => "activities",
            CatalogKind::Transport => "transport",
        }
    }

    pub fn from_resource(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.resource() == segment)
    }

    /// Accepted values for `CatalogItem::category`.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            CatalogKind::Location => &[
                "beach", "cultural", "nature", "wildlife", "historical", "religious", "adventure", "city",
            ],
            CatalogKind::Accommodation => &[
                "hotel", "resort", "villa", "guesthouse", "homestay", "boutique", "eco_lodge",
            ],
            CatalogKind::Activity => &[
                "adventure", "cultural", "water_sports", "wildlife", "wellness", "culinary", "sightseeing",
            ],
            CatalogKind::Transport => &[
                "car", "van", "bus", "tuk_tuk", "train", "domestic_flight", "boat",
            ],
        }
    }

    pub fn accepts_category(&self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownKind(s.to_string()))
    }
}

/// An orderable offering with a price and an availability flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: Uuid,
    pub kind: CatalogKind,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub available: bool,
    pub description: String,
    pub city: Option<String>,
    /// Stored image path, e.g. `uploads/locations/sigiriya.jpg`.
    pub image: Option<String>,
    /// Kind-specific descriptive data (star rating, duration, vehicle model...).
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewCatalogItem {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub available: Option<bool>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub image: Option<String>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CatalogItemPatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub available: Option<bool>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub image: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl CatalogItem {
    pub fn new(kind: CatalogKind, input: NewCatalogItem) -> Result<Self, CatalogError> {
        input
            .validate()
            .map_err(|e| CatalogError::InvalidFields(invalid_fields(&e)))?;
        check_category(kind, &input.category)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            name: input.name.trim().to_string(),
            category: input.category,
            price: input.price.unwrap_or(0.0),
            available: input.available.unwrap_or(true),
            description: input.description.unwrap_or_default(),
            city: input.city,
            image: input.image,
            details: input.details.unwrap_or_else(|| serde_json::json!({})),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update in place. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: CatalogItemPatch) -> Result<(), CatalogError> {
        patch
            .validate()
            .map_err(|e| CatalogError::InvalidFields(invalid_fields(&e)))?;
        if let Some(category) = &patch.category {
            check_category(self.kind, category)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if patch.city.is_some() {
            self.city = patch.city;
        }
        if patch.image.is_some() {
            self.image = patch.image;
        }
        if let Some(details) = patch.details {
            self.details = details;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }
}

fn check_category(kind: CatalogKind, category: &str) -> Result<(), CatalogError> {
    if kind.accepts_category(category) {
        Ok(())
    } else {
        Err(CatalogError::UnknownCategory {
            kind,
            category: category.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid or missing fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("Unknown category '{category}' for {kind}")]
    UnknownCategory { kind: CatalogKind, category: String },

    #[error("Unknown catalog kind: {0}")]
    UnknownKind(String),
}
