//! Pessimistic per-production-run locking.
//!
//! The check-then-append sequence is not safe as two separate steps under
//! concurrent load, so every mutating workflow serializes on an exclusive
//! lock keyed by production run. Locks are created on first use and never
//! dropped; a label's set of live production runs is small.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use labelstock_core::{InventoryError, InventoryResult, ProductionRunId};

/// Registry handing out one exclusive lock per production run.
#[derive(Debug, Default)]
pub struct RunLocks {
    locks: Mutex<HashMap<ProductionRunId, Arc<Mutex<()>>>>,
}

impl RunLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for one run. Callers hold the returned `Arc` and lock it
    /// for the duration of their critical section.
    pub fn lock_for(&self, run_id: ProductionRunId) -> InventoryResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| InventoryError::concurrent("run lock registry poisoned"))?;
        Ok(locks.entry(run_id).or_default().clone())
    }

    /// Locks for several runs, deduplicated and in sorted id order so that
    /// multi-run workflows (a sale with line items against different runs)
    /// always acquire in the same order and cannot deadlock each other.
    pub fn locks_for(
        &self,
        run_ids: impl IntoIterator<Item = ProductionRunId>,
    ) -> InventoryResult<Vec<Arc<Mutex<()>>>> {
        let mut ids: Vec<ProductionRunId> = run_ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        ids.into_iter().map(|id| self.lock_for(id)).collect()
    }
}
