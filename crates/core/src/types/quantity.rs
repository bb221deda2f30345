//! Cart line quantity.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    Zero,
    /// Quantity exceeds the per-line maximum.
    #[error("quantity must be at most {max} (got {got})")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
        /// The rejected value.
        got: u32,
    },
}

/// A positive line quantity, capped at [`Quantity::MAX`].
///
/// Deserialization is strict: a stored `0` or a value above the cap is an
/// error, which lets storage readers detect corrupt blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Largest quantity a single cart line may hold.
    pub const MAX: u32 = 999;

    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero and values above the cap.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] if `n` is zero or larger than [`Quantity::MAX`].
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        if n == 0 {
            Err(QuantityError::Zero)
        } else if n > Self::MAX {
            Err(QuantityError::TooLarge {
                max: Self::MAX,
                got: n,
            })
        } else {
            Ok(Self(n))
        }
    }

    /// Clamp an arbitrary count into range. Returns `None` for zero.
    #[must_use]
    pub const fn clamped(n: u32) -> Option<Self> {
        if n == 0 {
            None
        } else if n > Self::MAX {
            Some(Self(Self::MAX))
        } else {
            Some(Self(n))
        }
    }

    /// Add two quantities, saturating at the cap.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        let sum = self.0 + other.0;
        if sum > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(sum)
        }
    }

    /// The underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert!(matches!(
            Quantity::new(1000),
            Err(QuantityError::TooLarge { max: 999, got: 1000 })
        ));
        assert_eq!(Quantity::new(999).unwrap().get(), 999);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Quantity::clamped(0), None);
        assert_eq!(Quantity::clamped(5).unwrap().get(), 5);
        assert_eq!(Quantity::clamped(5000).unwrap().get(), Quantity::MAX);
    }

    #[test]
    fn test_saturating_add() {
        let a = Quantity::new(600).unwrap();
        let b = Quantity::new(500).unwrap();
        assert_eq!(a.saturating_add(b).get(), Quantity::MAX);
        assert_eq!(Quantity::ONE.saturating_add(Quantity::ONE).get(), 2);
    }

    #[test]
    fn test_deserialize_is_strict() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("1000").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
    }
}
