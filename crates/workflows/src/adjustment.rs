//! Adjustment workflow: free-form corrections.
//!
//! Adjustments bypass the availability checks on purpose — they exist to
//! make the ledger agree with reality (damaged-goods write-offs, warehouse
//! recounts), not to enforce it. They still go through draft validation, so
//! a zero quantity or identical endpoints never reach the ledger.

use tracing::{debug, info};

use labelstock_catalog::{DistributorRegistry, ProductionRunRegistry};
use labelstock_core::{
    InventoryError, InventoryResult, Location, ProductionRunId, Quantity, ReferenceId,
};
use labelstock_ledger::{InventoryMovement, MovementDraft, MovementStore, MovementType};

use crate::allocation::AllocationStore;
use crate::service::InventoryService;

impl<S, A, P, D> InventoryService<S, A, P, D>
where
    S: MovementStore,
    A: AllocationStore,
    P: ProductionRunRegistry,
    D: DistributorRegistry,
{
    /// Record a correction between any two distinct locations.
    ///
    /// `reason` is required and goes to the log; the owning correction
    /// record (with the full explanation) lives outside this core.
    pub fn record_adjustment(
        &self,
        adjustment_id: ReferenceId,
        production_run_id: ProductionRunId,
        from: Location,
        to: Location,
        quantity: Quantity,
        reason: &str,
    ) -> InventoryResult<InventoryMovement> {
        if reason.trim().is_empty() {
            return Err(InventoryError::invalid_movement(
                "adjustment requires a reason",
            ));
        }
        self.production_runs.get(production_run_id)?;

        let draft =
            MovementDraft::adjustment(production_run_id, from, to, quantity, adjustment_id)?;

        info!(
            %adjustment_id,
            %production_run_id,
            %from,
            %to,
            %quantity,
            reason,
            "recording inventory adjustment"
        );

        let lock = self.locks.lock_for(production_run_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| InventoryError::concurrent("run lock poisoned"))?;

        let mut recorded = self.movements.append(vec![draft])?;
        debug!(%adjustment_id, "adjustment recorded");
        Ok(recorded.remove(0))
    }

    /// Delete an adjustment's movement. No-op if already deleted.
    pub fn delete_adjustment(&self, adjustment_id: ReferenceId) -> InventoryResult<bool> {
        info!(%adjustment_id, "deleting adjustment movement");
        self.delete_reference_under_locks(&[MovementType::Adjustment], adjustment_id)
    }
}
