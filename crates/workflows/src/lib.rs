//! `labelstock-workflows` — guarded write workflows over the movement ledger.
//!
//! Every mutating operation follows the same shape: acquire the production
//! run's exclusive lock, derive the balances the precondition needs from the
//! ledger, reject with zero writes if the check fails, otherwise append the
//! movements (and the owning business record) inside the same critical
//! section. Reversal takes the same locks, so a delete can never race a
//! concurrent allocate into over-allocation.

pub mod allocation;
pub mod locks;
pub mod queries;
pub mod service;

mod adjustment;
mod returns;
mod sale;
mod transfer;


pub use allocation::{AllocationStore, ChannelAllocation, InMemoryAllocationStore};
pub use queries::DistributorInventorySummary;
pub use returns::ReturnLine;
pub use sale::SaleLine;
pub use service::InventoryService;
