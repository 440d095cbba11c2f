//! `labelstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the inventory error taxonomy, and the value
//! objects shared by the ledger and the workflows.

pub mod error;
pub mod id;
pub mod location;
pub mod quantity;

pub use error::{InventoryError, InventoryResult};
pub use id::{
    AllocationId, DistributorId, MovementId, ProductionRunId, ReferenceId, ReleaseId,
};
pub use location::Location;
pub use quantity::Quantity;
