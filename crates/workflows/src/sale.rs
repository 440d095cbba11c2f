//! Sale workflow: distributor stock leaving the system.

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

/// One line of a sale, pinned to an explicit production run.
///
/// The run reference is deliberate: sales are never matched to runs by
/// release and format after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
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
    /// Record a sale from a distributor to the outside world.
    ///
    /// Each line must be covered by the distributor's current balance for
    /// its production run; a run the distributor was never allocated stock
    /// from is rejected with `NoAllocationForDistributor` before the
    /// balance check. All lines are validated before any movement is
    /// appended, then committed as one batch sharing `sale_id` as the
    /// reference.
    pub fn record_sale(
        &self,
        sale_id: ReferenceId,
        distributor_id: DistributorId,
        lines: Vec<SaleLine>,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        if lines.is_empty() {
            return Err(InventoryError::invalid_movement("sale must have line items"));
        }

        info!(%sale_id, %distributor_id, lines = lines.len(), "recording sale");

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
                self.check_run_coverage(run_id, distributor_id, &lines)?;
            }
            drafts.push(MovementDraft::sale(
                run_id,
                distributor_id,
                line.quantity,
                sale_id,
            ));
        }

        let recorded = self.movements.append(drafts)?;
        debug!(%sale_id, movements = recorded.len(), "sale movements recorded");
        Ok(recorded)
    }

    /// Delete a sale's movements, restoring the distributor balances.
    /// No-op if the sale left no movements (already deleted).
    pub fn delete_sale(&self, sale_id: ReferenceId) -> InventoryResult<bool> {
        info!(%sale_id, "deleting sale movements");
        self.delete_reference_under_locks(&[MovementType::Sale], sale_id)
    }

    /// Check that the distributor was allocated stock from the run and
    /// that its current balance covers all lines against the run combined.
    fn check_run_coverage(
        &self,
        run_id: ProductionRunId,
        distributor_id: DistributorId,
        lines: &[SaleLine],
    ) -> InventoryResult<()> {
        // Surface a missing run before reporting anything about balances.
        self.production_runs.get(run_id)?;

        let has_allocation = self
            .allocations
            .for_run(run_id)?
            .iter()
            .any(|a| a.distributor_id == distributor_id);
        if !has_allocation {
            return Err(InventoryError::NoAllocationForDistributor {
                production_run_id: run_id,
                distributor_id,
            });
        }

        let requested: i64 = lines
            .iter()
            .filter(|l| l.production_run_id == run_id)
            .map(|l| l.quantity.as_i64())
            .sum();
        let stream = self.movements.movements_for_run(run_id)?;
        let available = balance_at(&stream, Location::Distributor(distributor_id));
        if requested > available {
            return Err(InventoryError::insufficient(requested, available));
        }
        Ok(())
    }
}
