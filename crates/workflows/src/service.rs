//! The inventory service: one entry point for all guarded workflows.

use tracing::{debug, error, info};

use labelstock_catalog::{DistributorRegistry, ProductionRunRegistry};
use labelstock_core::{
    AllocationId, DistributorId, InventoryError, InventoryResult, ProductionRunId, Quantity,
    ReferenceId,
};
use labelstock_ledger::balance::total_allocated;
use labelstock_ledger::{InventoryMovement, MovementDraft, MovementStore, MovementType};

use crate::allocation::{AllocationStore, ChannelAllocation};
use crate::locks::RunLocks;

/// Guarded write operations and the read-only query surface over the
/// movement ledger.
///
/// Holds the ledger, the allocation records, the collaborator registries,
/// and the per-run lock registry. All methods take `&self`; share the
/// service behind an `Arc` to call it from several threads.
pub struct InventoryService<S, A, P, D> {
    pub(crate) movements: S,
    pub(crate) allocations: A,
    pub(crate) production_runs: P,
    pub(crate) distributors: D,
    pub(crate) locks: RunLocks,
}

impl<S, A, P, D> InventoryService<S, A, P, D>
where
    S: MovementStore,
    A: AllocationStore,
    P: ProductionRunRegistry,
    D: DistributorRegistry,
{
    pub fn new(movements: S, allocations: A, production_runs: P, distributors: D) -> Self {
        Self {
            movements,
            allocations,
            production_runs,
            distributors,
            locks: RunLocks::new(),
        }
    }

    pub(crate) fn require_distributor(&self, id: DistributorId) -> InventoryResult<()> {
        if self.distributors.exists(id) {
            Ok(())
        } else {
            Err(InventoryError::DistributorNotFound(id))
        }
    }

    /// Allocate warehouse stock from a production run to a distributor.
    ///
    /// Fails with `ProductionRunNotFound` / `DistributorNotFound` if either
    /// party is unknown, and with `InsufficientInventory` if the request
    /// would push total allocations past the run's manufactured quantity.
    /// On rejection nothing is written. On success the allocation record
    /// and its `Warehouse → Distributor` movement commit inside the run's
    /// critical section.
    pub fn allocate(
        &self,
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
        quantity: Quantity,
    ) -> InventoryResult<ChannelAllocation> {
        let run = self.production_runs.get(production_run_id)?;
        self.require_distributor(distributor_id)?;

        info!(
            %production_run_id,
            %distributor_id,
            %quantity,
            "allocating units to distributor"
        );

        let lock = self.locks.lock_for(production_run_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| InventoryError::concurrent("run lock poisoned"))?;

        let stream = self.movements.movements_for_run(production_run_id)?;
        let allocated = total_allocated(&stream);
        if !run.can_allocate(quantity.as_i64(), allocated) {
            return Err(InventoryError::insufficient(
                quantity.as_i64(),
                run.available_quantity(allocated),
            ));
        }

        let allocation = ChannelAllocation::new(production_run_id, distributor_id, quantity);
        let draft = MovementDraft::allocation(
            production_run_id,
            distributor_id,
            quantity,
            allocation.id.into(),
        );
        self.movements.append(vec![draft])?;
        if let Err(e) = self.allocations.insert(allocation.clone()) {
            // Keep the ledger and the records in step even on a store
            // failure mid-commit.
            if let Err(cleanup) = self
                .movements
                .delete_by_reference(MovementType::Allocation, allocation.id.into())
            {
                error!(
                    allocation_id = %allocation.id,
                    error = %cleanup,
                    "movement left orphaned after allocation record insert failed"
                );
            }
            return Err(e);
        }

        debug!(allocation_id = %allocation.id, "allocation created");
        Ok(allocation)
    }

    /// Delete an allocation and its linked movement, restoring the prior
    /// balances. Deleting an allocation that is already gone is a no-op;
    /// the return value says whether anything was deleted.
    pub fn delete_allocation(&self, allocation_id: AllocationId) -> InventoryResult<bool> {
        // Unlocked read, only to learn which run lock to take.
        let Some(allocation) = self.allocations.get(allocation_id)? else {
            debug!(%allocation_id, "allocation already deleted");
            return Ok(false);
        };

        info!(
            %allocation_id,
            production_run_id = %allocation.production_run_id,
            "deleting allocation"
        );

        let lock = self.locks.lock_for(allocation.production_run_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| InventoryError::concurrent("run lock poisoned"))?;

        // A racing delete may have won while we waited for the lock; the
        // remove under the lock is what decides.
        if self.allocations.remove(allocation_id)?.is_none() {
            debug!(%allocation_id, "allocation already deleted");
            return Ok(false);
        }
        self.movements
            .delete_by_reference(MovementType::Allocation, allocation_id.into())?;
        Ok(true)
    }

    /// Delete every movement carrying the reference under one of the given
    /// types, holding the lock of each run those movements touch.
    ///
    /// The run set is discovered by an unlocked read, so it is re-checked
    /// once the locks are held: movements appended under the same reference
    /// onto another run in the window would otherwise be deleted without
    /// that run's lock. If the set grew, the locks are dropped and the
    /// whole acquisition is retried against the new set.
    ///
    /// Returns whether anything was deleted; a reference with no matching
    /// movements is a no-op.
    pub(crate) fn delete_reference_under_locks(
        &self,
        movement_types: &[MovementType],
        reference_id: ReferenceId,
    ) -> InventoryResult<bool> {
        loop {
            let movements = self.movements_by_reference_types(movement_types, reference_id)?;
            if movements.is_empty() {
                return Ok(false);
            }

            let locks = self
                .locks
                .locks_for(movements.iter().map(|m| m.production_run_id))?;
            let mut guards = Vec::with_capacity(locks.len());
            for lock in &locks {
                guards.push(
                    lock.lock()
                        .map_err(|_| InventoryError::concurrent("run lock poisoned"))?,
                );
            }

            let current = self.movements_by_reference_types(movement_types, reference_id)?;
            let covered = current.iter().all(|m| {
                movements
                    .iter()
                    .any(|known| known.production_run_id == m.production_run_id)
            });
            if !covered {
                continue;
            }

            let mut deleted = 0;
            for movement_type in movement_types {
                deleted += self
                    .movements
                    .delete_by_reference(*movement_type, reference_id)?;
            }
            return Ok(deleted > 0);
        }
    }

    fn movements_by_reference_types(
        &self,
        movement_types: &[MovementType],
        reference_id: ReferenceId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        let mut movements = Vec::new();
        for movement_type in movement_types {
            movements.extend(
                self.movements
                    .movements_by_reference(*movement_type, reference_id)?,
            );
        }
        Ok(movements)
    }
}
