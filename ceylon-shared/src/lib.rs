pub mod pii;
pub mod validation;

pub use pii::Masked;
pub use validation::invalid_fields;
