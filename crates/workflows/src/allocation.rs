//! Channel allocations: warehouse stock earmarked for a distributor.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labelstock_core::{
    AllocationId, DistributorId, InventoryError, InventoryResult, ProductionRunId, Quantity,
};

/// The business record behind an allocation movement.
///
/// Created once per granted allocation request and never mutated. Deleting
/// it also deletes the linked `Allocation` movement (same `reference_id`),
/// which restores both the distributor balance and the run's unallocated
/// capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAllocation {
    pub id: AllocationId,
    pub production_run_id: ProductionRunId,
    pub distributor_id: DistributorId,
    pub quantity: Quantity,
    pub allocated_at: DateTime<Utc>,
}

impl ChannelAllocation {
    pub fn new(
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: AllocationId::new(),
            production_run_id,
            distributor_id,
            quantity,
            allocated_at: Utc::now(),
        }
    }
}

/// Storage boundary for allocation records.
pub trait AllocationStore: Send + Sync {
    fn insert(&self, allocation: ChannelAllocation) -> InventoryResult<()>;

    fn get(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>>;

    /// Remove and return the record, or `None` if it was already gone.
    fn remove(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>>;

    /// All allocations for a run, oldest first.
    fn for_run(&self, run_id: ProductionRunId) -> InventoryResult<Vec<ChannelAllocation>>;
}

impl<S> AllocationStore for Arc<S>
where
    S: AllocationStore + ?Sized,
{
    fn insert(&self, allocation: ChannelAllocation) -> InventoryResult<()> {
        (**self).insert(allocation)
    }

    fn get(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>> {
        (**self).get(id)
    }

    fn remove(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>> {
        (**self).remove(id)
    }

    fn for_run(&self, run_id: ProductionRunId) -> InventoryResult<Vec<ChannelAllocation>> {
        (**self).for_run(run_id)
    }
}

/// In-memory allocation store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAllocationStore {
    allocations: RwLock<HashMap<AllocationId, ChannelAllocation>>,
}

impl InMemoryAllocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> InventoryResult<std::sync::RwLockReadGuard<'_, HashMap<AllocationId, ChannelAllocation>>>
    {
        self.allocations
            .read()
            .map_err(|_| InventoryError::concurrent("allocation store lock poisoned"))
    }
}

impl AllocationStore for InMemoryAllocationStore {
    fn insert(&self, allocation: ChannelAllocation) -> InventoryResult<()> {
        let mut allocations = self
            .allocations
            .write()
            .map_err(|_| InventoryError::concurrent("allocation store lock poisoned"))?;
        allocations.insert(allocation.id, allocation);
        Ok(())
    }

    fn get(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn remove(&self, id: AllocationId) -> InventoryResult<Option<ChannelAllocation>> {
        let mut allocations = self
            .allocations
            .write()
            .map_err(|_| InventoryError::concurrent("allocation store lock poisoned"))?;
        Ok(allocations.remove(&id))
    }

    fn for_run(&self, run_id: ProductionRunId) -> InventoryResult<Vec<ChannelAllocation>> {
        let mut result: Vec<ChannelAllocation> = self
            .read()?
            .values()
            .filter(|a| a.production_run_id == run_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.allocated_at);
        Ok(result)
    }
}
