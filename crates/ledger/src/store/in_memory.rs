use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use labelstock_core::{
    DistributorId, InventoryError, InventoryResult, MovementId, ProductionRunId, ReferenceId,
};

use super::r#trait::MovementStore;
use crate::movement::{InventoryMovement, MovementDraft, MovementType};

/// In-memory movement store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    streams: RwLock<HashMap<ProductionRunId, Vec<InventoryMovement>>>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp for this batch within one run's stream: the wall clock,
    /// bumped past the stream head if the clock has not advanced.
    fn next_occurred_at(stream: &[InventoryMovement], now: DateTime<Utc>) -> DateTime<Utc> {
        match stream.last() {
            Some(head) if head.occurred_at >= now => head.occurred_at + Duration::microseconds(1),
            _ => now,
        }
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(&self, drafts: Vec<MovementDraft>) -> InventoryResult<Vec<InventoryMovement>> {
        if drafts.is_empty() {
            return Ok(vec![]);
        }

        let mut streams = self
            .streams
            .write()
            .map_err(|_| InventoryError::concurrent("movement store lock poisoned"))?;

        // One timestamp per run per batch, so paired legs are simultaneous.
        let now = Utc::now();
        let mut batch_timestamps: HashMap<ProductionRunId, DateTime<Utc>> = HashMap::new();
        let mut recorded = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let stream = streams.entry(draft.production_run_id).or_default();
            let occurred_at = *batch_timestamps
                .entry(draft.production_run_id)
                .or_insert_with(|| Self::next_occurred_at(stream, now));

            let movement = InventoryMovement {
                id: MovementId::new(),
                production_run_id: draft.production_run_id,
                from: draft.from,
                to: draft.to,
                quantity: draft.quantity,
                movement_type: draft.movement_type,
                occurred_at,
                reference_id: draft.reference_id,
            };
            debug!(
                movement_type = %movement.movement_type,
                production_run_id = %movement.production_run_id,
                from = %movement.from,
                to = %movement.to,
                quantity = %movement.quantity,
                "recorded movement"
            );
            stream.push(movement.clone());
            recorded.push(movement);
        }

        Ok(recorded)
    }

    fn movements_for_run(
        &self,
        run_id: ProductionRunId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InventoryError::concurrent("movement store lock poisoned"))?;
        Ok(streams.get(&run_id).cloned().unwrap_or_default())
    }

    fn movements_for_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InventoryError::concurrent("movement store lock poisoned"))?;
        let mut movements: Vec<InventoryMovement> = streams
            .values()
            .flatten()
            .filter(|m| m.involves_distributor(distributor_id))
            .cloned()
            .collect();
        movements.sort_by_key(|m| m.occurred_at);
        Ok(movements)
    }

    fn movements_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<Vec<InventoryMovement>> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InventoryError::concurrent("movement store lock poisoned"))?;
        let mut movements: Vec<InventoryMovement> = streams
            .values()
            .flatten()
            .filter(|m| m.movement_type == movement_type && m.reference_id == Some(reference_id))
            .cloned()
            .collect();
        movements.sort_by_key(|m| m.occurred_at);
        Ok(movements)
    }

    fn delete_by_reference(
        &self,
        movement_type: MovementType,
        reference_id: ReferenceId,
    ) -> InventoryResult<usize> {
        let mut streams = self
            .streams
            .write()
            .map_err(|_| InventoryError::concurrent("movement store lock poisoned"))?;

        let mut deleted = 0;
        for stream in streams.values_mut() {
            let before = stream.len();
            stream.retain(|m| {
                !(m.movement_type == movement_type && m.reference_id == Some(reference_id))
            });
            deleted += before - stream.len();
        }

        if deleted > 0 {
            debug!(%movement_type, %reference_id, deleted, "deleted movements by reference");
        }
        Ok(deleted)
    }
}
