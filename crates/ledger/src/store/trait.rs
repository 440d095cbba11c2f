use std::sync::Arc;

use labelstock_core::{DistributorId, InventoryResult, ProductionRunId, ReferenceId};

use crate::movement::{InventoryMovement, MovementDraft, MovementType};

/// Append-only store of inventory movements, organized into one stream per
/// production run.
///
/// ## Append semantics
///
/// `append()` takes a batch of validated drafts and records them
/// all-or-nothing. The store assigns each movement its `MovementId` and its
/// `occurred_at`: timestamps are strictly monotonic within a run's stream
/// across batches, and all movements of one batch that belong to the same
/// run share a single timestamp (the two legs of a transfer are
/// indistinguishable in time). A batch may span several runs (a sale with
/// line items against different runs).
///
/// ## Read semantics
///
/// `movements_for_run` returns the full stream in recorded order (ascending
/// `occurred_at`, append order within a batch). `movements_for_distributor`
/// returns every movement touching the distributor on either side, across
/// runs, in timestamp order. A missing stream is valid and reads as empty.
///
/// ## Delete semantics
///
/// `delete_by_reference` is the reversal path and the only mutation:
/// it removes every movement carrying the `(movement_type, reference_id)`
/// pair and reports how many rows went away. Deleting a reference that no
/// longer matches anything is a no-op returning 0.
///
/// Callers are responsible for serializing check-then-append sequences per
/// production run; the store itself only guarantees that individual calls
/// are atomic.
pub trait MovementStore: Send + Sync {
    /// Record a batch of movements atomically, assigning ids and timestamps.
    fn append(&self, drafts: Vec<MovementDraft>) -> InventoryResult<Vec<InventoryMovement>>;

    /// Full stream for one production run, in recorded order.
    fn movements_for_run(&self, run_id: ProductionRunId)
    -> InventoryResult<Vec<InventoryMovement>>;

    /// Every movement involving the distributor, across runs, in timestamp
    /// order.
    fn movements_for_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> InventoryResult<Vec<InventoryMovement>>;

    /// Every movement carrying `(movement_type, reference_id)`. Reversal
    /// uses this to learn which run locks to take before deleting.
    fn movements_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<Vec<InventoryMovement>>;

    /// Bulk-delete all movements carrying `(movement_type, reference_id)`.
    /// Returns the number of deleted movements.
    fn delete_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<usize>;
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn append(&self, drafts: Vec<MovementDraft>) -> InventoryResult<Vec<InventoryMovement>> {
        (**self).append(drafts)
    }

    fn movements_for_run(
        &self,
        run_id: ProductionRunId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        (**self).movements_for_run(run_id)
    }

    fn movements_for_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        (**self).movements_for_distributor(distributor_id)
    }

    fn movements_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        (**self).movements_by_reference(movement_type, reference_id)
    }

    fn delete_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<usize> {
        (**self).delete_by_reference(movement_type, reference_id)
    }
}
