pub mod item;
pub mod filter;
pub mod pricing;

pub use item::{CatalogError, CatalogItem, CatalogItemPatch, CatalogKind, NewCatalogItem};
pub use filter::CatalogFilter;
pub use pricing::{PricingConfig, PricingEngine, TripQuote};
