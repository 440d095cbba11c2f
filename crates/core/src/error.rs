//! Inventory error model.

use thiserror::Error;

use crate::id::{DistributorId, ProductionRunId};

/// Result type used across the inventory core.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory-level error.
///
/// Keep this focused on deterministic domain failures (validation,
/// availability, invariants). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The referenced production run does not exist upstream. Fatal to the
    /// calling workflow; not retryable.
    #[error("production run not found: {0}")]
    ProductionRunNotFound(ProductionRunId),

    /// The referenced distributor does not exist upstream.
    #[error("distributor not found: {0}")]
    DistributorNotFound(DistributorId),

    /// An availability or capacity precondition failed. Recoverable: the
    /// caller may retry with a smaller quantity. No writes were performed.
    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: i64, available: i64 },

    /// The distributor has no allocation at all for the production run, so
    /// a sale against it cannot make sense yet.
    #[error(
        "no inventory allocated from production run {production_run_id} to distributor {distributor_id}"
    )]
    NoAllocationForDistributor {
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
    },

    /// A lock or commit conflict was detected. The caller should retry the
    /// whole workflow once, not resume mid-way.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// A movement failed structural validation (quantity ≤ 0, or from ==
    /// to). Programmer error; fails fast and is never persisted.
    #[error("invalid movement: {0}")]
    InvalidMovement(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found (e.g. deleting an allocation that
    /// is already gone).
    #[error("not found: {0}")]
    NotFound(String),
}

impl InventoryError {
    pub fn insufficient(requested: i64, available: i64) -> Self {
        Self::InsufficientInventory {
            requested,
            available,
        }
    }

    pub fn concurrent(msg: impl Into<String>) -> Self {
        Self::ConcurrentModification(msg.into())
    }

    pub fn invalid_movement(msg: impl Into<String>) -> Self {
        Self::InvalidMovement(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the caller can meaningfully retry after showing the failure
    /// to a user (as opposed to a programmer or data error).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientInventory { .. }
                | Self::NoAllocationForDistributor { .. }
                | Self::ConcurrentModification(_)
        )
    }
}
