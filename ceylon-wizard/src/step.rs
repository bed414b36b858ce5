use serde::{Deserialize, Serialize};
use std::fmt;

use ceylon_catalog::CatalogKind;

/// Wizard steps in their fixed order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Location,
    Transport,
    Accommodation,
    Activity,
    Payment,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Location,
        Step::Transport,
        Step::Accommodation,
        Step::Activity,
        Step::Payment,
    ];

    /// 1-based position shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Step::Location => 1,
            Step::Transport => 2,
            Step::Accommodation => 3,
            Step::Activity => 4,
            Step::Payment => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// The following step, or `self` at the last one.
    pub fn forward(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(self)
    }

    /// The preceding step, or `self` at the first one.
    pub fn backward(self) -> Self {
        match self.number() {
            1 => self,
            n => Self::from_number(n - 1).unwrap_or(self),
        }
    }

    /// Catalog collection listed on this step. Payment has none.
    pub fn catalog_kind(&self) -> Option<CatalogKind> {
        match self {
            Step::Location => Some(CatalogKind::Location),
            Step::Transport => Some(CatalogKind::Transport),
            Step::Accommodation => Some(CatalogKind::Accommodation),
            Step::Activity => Some(CatalogKind::Activity),
            Step::Payment => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Location => "Choose locations",
            Step::Transport => "Choose transport",
            Step::Accommodation => "Choose accommodation",
            Step::Activity => "Choose activities",
            Step::Payment => "Payment",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Location => "location",
            Step::Transport => "transport",
            Step::Accommodation => "accommodation",
            Step::Activity => "activity",
            Step::Payment => "payment",
        })
    }
}
