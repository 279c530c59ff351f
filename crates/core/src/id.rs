//! Strongly-typed identifiers used across the domain.
//!
//! Catalog identifiers come from the supplier feed as opaque strings, so these
//! wrap a `String` rather than a UUID.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product (unique, stable for the product's lifetime).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Supplier stock-keeping unit (unique within the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap an identifier without validation.
            ///
            /// Prefer `parse()` for untrusted input; this is meant for fixtures and
            /// values that already passed through the import pipeline.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: must not be empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_newtype!(ProductId, "ProductId");
impl_string_newtype!(Sku, "Sku");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        let id: ProductId = "  42 ".parse().unwrap();
        assert_eq!(id.as_str(), "42");

        let err = "   ".parse::<Sku>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("Sku")));
    }

    #[test]
    fn serializes_transparently() {
        let sku = Sku::new("WH-8842-BL");
        assert_eq!(serde_json::to_string(&sku).unwrap(), "\"WH-8842-BL\"");
    }
}
