//! Transfer workflow: stock moving distributor-to-distributor.

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

impl<S, A, P, D> InventoryService<S, A, P, D>
where
    S: MovementStore,
    A: AllocationStore,
    P: ProductionRunRegistry,
    D: DistributorRegistry,
{
    /// Move stock from one distributor to another as a paired
    /// `TransferOut`/`TransferIn` at the same instant, sharing
    /// `transfer_id` as the reference. The pair commits in one batch — a
    /// transfer is never partially recorded.
    pub fn transfer(
        &self,
        transfer_id: ReferenceId,
        production_run_id: ProductionRunId,
        from: DistributorId,
        to: DistributorId,
        quantity: Quantity,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        self.production_runs.get(production_run_id)?;
        self.require_distributor(from)?;
        self.require_distributor(to)?;

        // Validates from != to before any locking.
        let (out, incoming) =
            MovementDraft::transfer_pair(production_run_id, from, to, quantity, transfer_id)?;

        info!(
            %transfer_id,
            %production_run_id,
            from_distributor = %from,
            to_distributor = %to,
            %quantity,
            "transferring units between distributors"
        );

        let lock = self.locks.lock_for(production_run_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| InventoryError::concurrent("run lock poisoned"))?;

        let stream = self.movements.movements_for_run(production_run_id)?;
        let held = balance_at(&stream, Location::Distributor(from));
        if quantity.as_i64() > held {
            return Err(InventoryError::insufficient(quantity.as_i64(), held));
        }

        let recorded = self.movements.append(vec![out, incoming])?;
        debug!(%transfer_id, "transfer legs recorded");
        Ok(recorded)
    }

    /// Delete both legs of a transfer together. No-op if already deleted.
    pub fn delete_transfer(&self, transfer_id: ReferenceId) -> InventoryResult<bool> {
        info!(%transfer_id, "deleting transfer movements");
        self.delete_reference_under_locks(
            &[MovementType::TransferOut, MovementType::TransferIn],
            transfer_id,
        )
    }
}
