//! Product kinds sold by the shop.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known product kind.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product kind: {0}")]
pub struct ParseKindError(pub String);

/// The kind of a product.
///
/// Each kind carries its own set of technical specifications. The kind and
/// the product slug together identify a product in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.product_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Notebook,
    Smartphone,
}

impl ProductKind {
    /// All kinds, in catalog order.
    pub const ALL: [Self; 2] = [Self::Notebook, Self::Smartphone];

    /// The lowercase name used in URLs and in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notebook => "notebook",
            Self::Smartphone => "smartphone",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notebook" => Ok(Self::Notebook),
            "smartphone" => Ok(Self::Smartphone),
            other => Err(ParseKindError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("notebook".parse(), Ok(ProductKind::Notebook));
        assert_eq!("smartphone".parse(), Ok(ProductKind::Smartphone));
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert_eq!(
            "tablet".parse::<ProductKind>(),
            Err(ParseKindError("tablet".to_owned()))
        );
        assert!("Notebook".parse::<ProductKind>().is_err());
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in ProductKind::ALL {
            assert_eq!(kind.as_str().parse(), Ok(kind));
        }
    }
}
