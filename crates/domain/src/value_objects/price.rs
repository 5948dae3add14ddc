use crate::error::{Result, TokenomicsError};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token price quoted in the paired asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a price, rejecting zero and negative values.
    pub fn try_new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(TokenomicsError::invalid(format!(
                "price must be positive, got {value}"
            )));
        }
        Ok(Self { value })
    }

    /// Converts an `f64` price, rounding through the decimal representation.
    ///
    /// Values that cannot be represented (NaN, infinities, magnitudes above
    /// `Decimal::MAX`) are rejected.
    pub fn from_f64(value: f64) -> Result<Self> {
        Decimal::from_f64(value)
            .map(Self::new)
            .ok_or_else(|| TokenomicsError::invalid(format!("price {value} is not representable")))
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(0.0)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
