//! Production runs: one manufacturing batch of a release in one format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use labelstock_core::{ProductionRunId, ReleaseId};

/// Physical or digital format a release was manufactured in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseFormat {
    Vinyl,
    Cd,
    Cassette,
    /// Placeholder units for digital-only releases, so digital stock can
    /// flow through the same ledger.
    Digital,
}

impl core::fmt::Display for ReleaseFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Vinyl => write!(f, "vinyl"),
            Self::Cd => write!(f, "cd"),
            Self::Cassette => write!(f, "cassette"),
            Self::Digital => write!(f, "digital"),
        }
    }
}

/// One manufacturing batch of a specific release in a specific format.
///
/// Owned by the catalog collaborator and read-only to the inventory core.
/// `quantity` is the total number of units ever produced and is never
/// mutated after creation; it is the hard ceiling on allocations for this
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRun {
    pub id: ProductionRunId,
    pub release_id: ReleaseId,
    pub format: ReleaseFormat,
    /// Total units manufactured. Immutable after creation.
    pub quantity: u32,
    pub manufacturer: String,
    pub manufacturing_date: NaiveDate,
    pub description: Option<String>,
}

impl ProductionRun {
    /// Units of this run not yet allocated to any distributor.
    pub fn available_quantity(&self, currently_allocated: i64) -> i64 {
        i64::from(self.quantity) - currently_allocated
    }

    /// Whether `requested` more units can be allocated given what is
    /// already allocated.
    pub fn can_allocate(&self, requested: i64, currently_allocated: i64) -> bool {
        requested <= self.available_quantity(currently_allocated)
    }

    /// Derived allocation label; never stored.
    pub fn allocation_status(&self, currently_allocated: i64) -> AllocationStatus {
        if currently_allocated <= 0 {
            AllocationStatus::Unallocated
        } else if currently_allocated < i64::from(self.quantity) {
            AllocationStatus::PartiallyAllocated
        } else {
            AllocationStatus::FullyAllocated
        }
    }
}

/// How much of a production run has been allocated out of the warehouse.
///
/// Purely a label over `total_allocated` vs `quantity`; the only stored
/// truth is the movement ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Unallocated,
    PartiallyAllocated,
    FullyAllocated,
}
