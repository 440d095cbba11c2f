//! Collaborator registry boundaries.
//!
//! The inventory core never owns production runs or distributors; it reads
//! them through these traits. The in-memory implementations back tests and
//! development without making any storage assumptions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use labelstock_core::{DistributorId, InventoryError, InventoryResult, ProductionRunId};

use crate::production_run::ProductionRun;

/// Read-only access to production runs owned by the catalog collaborator.
pub trait ProductionRunRegistry: Send + Sync {
    /// Fetch a run, failing with `ProductionRunNotFound` if it does not
    /// exist upstream.
    fn get(&self, id: ProductionRunId) -> InventoryResult<ProductionRun>;
}

/// Read-only access to distributor identities.
pub trait DistributorRegistry: Send + Sync {
    fn exists(&self, id: DistributorId) -> bool;
}

impl<R> ProductionRunRegistry for Arc<R>
where
    R: ProductionRunRegistry + ?Sized,
{
    fn get(&self, id: ProductionRunId) -> InventoryResult<ProductionRun> {
        (**self).get(id)
    }
}

impl<R> DistributorRegistry for Arc<R>
where
    R: DistributorRegistry + ?Sized,
{
    fn exists(&self, id: DistributorId) -> bool {
        (**self).exists(id)
    }
}

/// In-memory production run registry.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductionRunRegistry {
    runs: RwLock<HashMap<ProductionRunId, ProductionRun>>,
}

impl InMemoryProductionRunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a run. Quantity is immutable afterwards: re-inserting the
    /// same id is rejected.
    pub fn insert(&self, run: ProductionRun) -> InventoryResult<()> {
        let mut runs = self
            .runs
            .write()
            .map_err(|_| InventoryError::concurrent("production run registry lock poisoned"))?;
        if runs.contains_key(&run.id) {
            return Err(InventoryError::invalid_id(format!(
                "production run already registered: {}",
                run.id
            )));
        }
        runs.insert(run.id, run);
        Ok(())
    }
}

impl ProductionRunRegistry for InMemoryProductionRunRegistry {
    fn get(&self, id: ProductionRunId) -> InventoryResult<ProductionRun> {
        let runs = self
            .runs
            .read()
            .map_err(|_| InventoryError::concurrent("production run registry lock poisoned"))?;
        runs.get(&id)
            .cloned()
            .ok_or(InventoryError::ProductionRunNotFound(id))
    }
}

/// In-memory distributor registry.
#[derive(Debug, Default)]
pub struct InMemoryDistributorRegistry {
    distributors: RwLock<HashSet<DistributorId>>,
}

impl InMemoryDistributorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: DistributorId) {
        if let Ok(mut distributors) = self.distributors.write() {
            distributors.insert(id);
        }
    }
}

impl DistributorRegistry for InMemoryDistributorRegistry {
    fn exists(&self, id: DistributorId) -> bool {
        self.distributors
            .read()
            .map(|d| d.contains(&id))
            .unwrap_or(false)
    }
}
