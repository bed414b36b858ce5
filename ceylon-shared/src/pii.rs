use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps sensitive values (card data, contact details) so they never show up
/// in `Debug`/`Display` output, while still serializing the real value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // API responses and storage need the real value; only log macros are masked.
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Masked<String> {
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Renders the value with everything but the last `visible` digits hidden,
    /// e.g. `**** 4242` for a card number.
    pub fn tail(&self, visible: usize) -> String {
        let digits: Vec<char> = self.0.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() <= visible {
            return "****".to_string();
        }
        let tail: String = digits[digits.len() - visible..].iter().collect();
        format!("**** {}", tail)
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
