//! Return workflow: distributor stock flowing back into the warehouse.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use labelstock_catalog::{DistributorRegistry, ProductionRunRegistry};
use labelstock_core::{
    DistributorId, InventoryError, InventoryResult, Location, ProductionRunId, Quantity,
    ReferenceId,
};
use labelstock_ledger::balance::balance_at;
use labelstock_ledger::{InventoryMovement, MovementDraft, MovementStore, MovementType};

use crate::allocation::AllocationStore;
use crate::service::InventoryService;

/// One line of a distributor return, pinned to an explicit production run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLine {
    pub production_run_id: ProductionRunId,
    pub quantity: Quantity,
}

impl<S, A, P, D> InventoryService<S, A, P, D>
where
    S: MovementStore,
    A: AllocationStore,
    P: ProductionRunRegistry,
    D: DistributorRegistry,
{
    /// Record a return of stock from a distributor back to the warehouse.
    ///
    /// A distributor cannot return more than it currently holds for a run;
    /// beyond that no allocation bookkeeping is touched — the returned
    /// units simply re-enter the warehouse, where a later allocation may
    /// hand them out again.
    pub fn record_return(
        &self,
        return_id: ReferenceId,
        distributor_id: DistributorId,
        lines: Vec<ReturnLine>,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        if lines.is_empty() {
            return Err(InventoryError::invalid_movement(
                "return must have line items",
            ));
        }

        info!(%return_id, %distributor_id, lines = lines.len(), "recording return");

        let locks = self
            .locks
            .locks_for(lines.iter().map(|l| l.production_run_id))?;
        let mut guards = Vec::with_capacity(locks.len());
        for lock in &locks {
            guards.push(
                lock.lock()
                    .map_err(|_| InventoryError::concurrent("run lock poisoned"))?,
            );
        }

        let mut drafts = Vec::with_capacity(lines.len());
        let mut runs_seen: Vec<ProductionRunId> = Vec::new();
        for line in &lines {
            let run_id = line.production_run_id;
            if !runs_seen.contains(&run_id) {
                runs_seen.push(run_id);
                self.check_return_coverage(run_id, distributor_id, &lines)?;
            }
            drafts.push(MovementDraft::distributor_return(
                run_id,
                distributor_id,
                line.quantity,
                return_id,
            ));
        }

        let recorded = self.movements.append(drafts)?;
        debug!(%return_id, movements = recorded.len(), "return movements recorded");
        Ok(recorded)
    }

    /// Delete a return's movements, moving the units back out of the
    /// warehouse to the distributor. No-op if already deleted.
    pub fn delete_return(&self, return_id: ReferenceId) -> InventoryResult<bool> {
        info!(%return_id, "deleting return movements");
        self.delete_reference_under_locks(&[MovementType::Return], return_id)
    }

    fn check_return_coverage(
        &self,
        run_id: ProductionRunId,
        distributor_id: DistributorId,
        lines: &[ReturnLine],
    ) -> InventoryResult<()> {
        self.production_runs.get(run_id)?;

        let requested: i64 = lines
            .iter()
            .filter(|l| l.production_run_id == run_id)
            .map(|l| l.quantity.as_i64())
            .sum();
        let stream = self.movements.movements_for_run(run_id)?;
        let held = balance_at(&stream, Location::Distributor(distributor_id));
        if requested > held {
            return Err(InventoryError::insufficient(requested, held));
        }
        Ok(())
    }
}
