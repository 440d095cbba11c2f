//! Read-only query surface for the display layer.
//!
//! These reads take no run locks: they may observe slightly stale state
//! under concurrent writes, which is fine because they never gate a write —
//! every precondition is re-derived inside the workflows' critical
//! sections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use labelstock_catalog::{AllocationStatus, DistributorRegistry, ProductionRunRegistry};
use labelstock_core::{DistributorId, InventoryResult, Location, ProductionRunId};
use labelstock_ledger::balance::{
    balance_at, balances_by_distributor, total_allocated, warehouse_balance,
};
use labelstock_ledger::{InventoryMovement, MovementStore};

use crate::allocation::{AllocationStore, ChannelAllocation};
use crate::service::InventoryService;

/// Per-distributor summary for one production run: what was allocated, what
/// is still held, and what has left through the distributor
/// (`sold = allocated − current`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorInventorySummary {
    pub allocated: i64,
    pub current: i64,
    pub sold: i64,
}

impl<S, A, P, D> InventoryService<S, A, P, D>
where
    S: MovementStore,
    A: AllocationStore,
    P: ProductionRunRegistry,
    D: DistributorRegistry,
{
    /// All allocation records for a run, oldest first.
    pub fn allocations_for_run(
        &self,
        run_id: ProductionRunId,
    ) -> InventoryResult<Vec<ChannelAllocation>> {
        self.allocations.for_run(run_id)
    }

    /// Net units out of the warehouse for a run. Returns flow back in, so
    /// returned stock re-enters allocation capacity.
    pub fn total_allocated(&self, run_id: ProductionRunId) -> InventoryResult<i64> {
        Ok(total_allocated(&self.movements.movements_for_run(run_id)?))
    }

    /// Manufactured quantity not yet allocated to any distributor.
    pub fn unallocated_quantity(&self, run_id: ProductionRunId) -> InventoryResult<i64> {
        let run = self.production_runs.get(run_id)?;
        let allocated = self.total_allocated(run_id)?;
        Ok(run.available_quantity(allocated))
    }

    /// Derived allocation label for a run.
    pub fn allocation_status(&self, run_id: ProductionRunId) -> InventoryResult<AllocationStatus> {
        let run = self.production_runs.get(run_id)?;
        let allocated = self.total_allocated(run_id)?;
        Ok(run.allocation_status(allocated))
    }

    /// Full movement history for a run, ordered by `occurred_at`.
    pub fn movement_history(
        &self,
        run_id: ProductionRunId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        self.movements.movements_for_run(run_id)
    }

    /// Every movement touching a distributor, across runs, ordered by
    /// `occurred_at`.
    pub fn movement_history_for_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        self.movements.movements_for_distributor(distributor_id)
    }

    /// Current balance a distributor holds for a run.
    pub fn distributor_balance(
        &self,
        run_id: ProductionRunId,
        distributor_id: DistributorId,
    ) -> InventoryResult<i64> {
        let stream = self.movements.movements_for_run(run_id)?;
        Ok(balance_at(&stream, Location::Distributor(distributor_id)))
    }

    /// Net warehouse balance for a run's stream (display only; the
    /// warehouse ceiling is the run quantity, not this number).
    pub fn warehouse_balance(&self, run_id: ProductionRunId) -> InventoryResult<i64> {
        Ok(warehouse_balance(&self.movements.movements_for_run(run_id)?))
    }

    /// Distributors currently holding stock for a run, with their balances.
    pub fn balances_by_distributor(
        &self,
        run_id: ProductionRunId,
    ) -> InventoryResult<BTreeMap<DistributorId, i64>> {
        Ok(balances_by_distributor(
            &self.movements.movements_for_run(run_id)?,
        ))
    }

    /// Allocation-vs-holdings summary for one distributor and run.
    pub fn distributor_summary(
        &self,
        run_id: ProductionRunId,
        distributor_id: DistributorId,
    ) -> InventoryResult<DistributorInventorySummary> {
        let allocated: i64 = self
            .allocations
            .for_run(run_id)?
            .iter()
            .filter(|a| a.distributor_id == distributor_id)
            .map(|a| a.quantity.as_i64())
            .sum();
        let current = self.distributor_balance(run_id, distributor_id)?;
        Ok(DistributorInventorySummary {
            allocated,
            current,
            sold: allocated - current,
        })
    }
}
