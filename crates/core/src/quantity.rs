//! Strictly positive movement quantity.

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};

/// A strictly positive number of physical units.
///
/// Every movement carries one of these, so a zero or negative quantity can
/// never reach the ledger. Compared by value; direction is expressed by the
/// movement's endpoints, never by sign.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: i64) -> InventoryResult<Self> {
        if value <= 0 {
            return Err(InventoryError::invalid_movement(format!(
                "quantity must be positive, got {value}"
            )));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| InventoryError::invalid_movement(format!("quantity out of range: {value}")))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// The quantity as a signed total, for balance arithmetic.
    pub fn as_i64(&self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = InventoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.as_i64()
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
