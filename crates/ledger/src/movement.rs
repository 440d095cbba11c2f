//! Inventory movements: atomic, directional, quantity-bearing transfers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labelstock_core::{
    DistributorId, InventoryError, InventoryResult, Location, MovementId, ProductionRunId,
    Quantity, ReferenceId,
};

/// Why a movement happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Allocation,
    Sale,
    TransferOut,
    TransferIn,
    Return,
    Adjustment,
}

impl MovementType {
    /// Stable name for log lines and serialized payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocation => "allocation",
            Self::Sale => "sale",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
            Self::Return => "return",
            Self::Adjustment => "adjustment",
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movement ready to be appended, not yet assigned an id or timestamp.
///
/// Drafts are the validation gate: a draft with `from == to` cannot be
/// constructed, and `Quantity` already rules out non-positive amounts, so
/// nothing structurally invalid ever reaches the store. The store assigns
/// `MovementId` and `occurred_at` during append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub production_run_id: ProductionRunId,
    pub from: Location,
    pub to: Location,
    pub quantity: Quantity,
    pub movement_type: MovementType,
    pub reference_id: Option<ReferenceId>,
}

impl MovementDraft {
    pub fn new(
        production_run_id: ProductionRunId,
        from: Location,
        to: Location,
        quantity: Quantity,
        movement_type: MovementType,
        reference_id: Option<ReferenceId>,
    ) -> InventoryResult<Self> {
        if from == to {
            return Err(InventoryError::invalid_movement(format!(
                "from and to must differ, both are {from}"
            )));
        }
        Ok(Self {
            production_run_id,
            from,
            to,
            quantity,
            movement_type,
            reference_id,
        })
    }

    /// Allocation: `Warehouse → Distributor(id)`.
    pub fn allocation(
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
        quantity: Quantity,
        reference_id: ReferenceId,
    ) -> Self {
        // Endpoints differ by construction.
        Self {
            production_run_id,
            from: Location::Warehouse,
            to: Location::Distributor(distributor_id),
            quantity,
            movement_type: MovementType::Allocation,
            reference_id: Some(reference_id),
        }
    }

    /// Sale: `Distributor(id) → External`.
    pub fn sale(
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
        quantity: Quantity,
        reference_id: ReferenceId,
    ) -> Self {
        Self {
            production_run_id,
            from: Location::Distributor(distributor_id),
            to: Location::External,
            quantity,
            movement_type: MovementType::Sale,
            reference_id: Some(reference_id),
        }
    }

    /// Return: `Distributor(id) → Warehouse`.
    pub fn distributor_return(
        production_run_id: ProductionRunId,
        distributor_id: DistributorId,
        quantity: Quantity,
        reference_id: ReferenceId,
    ) -> Self {
        Self {
            production_run_id,
            from: Location::Distributor(distributor_id),
            to: Location::Warehouse,
            quantity,
            movement_type: MovementType::Return,
            reference_id: Some(reference_id),
        }
    }

    /// Paired transfer legs, routed through the warehouse as a transit
    /// point: `Distributor(from) → Warehouse` then `Warehouse →
    /// Distributor(to)`.
    ///
    /// Both legs share the reference id and must be appended in one batch so
    /// they carry the same timestamp and commit together; the warehouse
    /// balance nets to zero and each distributor balance changes by exactly
    /// the transferred quantity.
    pub fn transfer_pair(
        production_run_id: ProductionRunId,
        from: DistributorId,
        to: DistributorId,
        quantity: Quantity,
        reference_id: ReferenceId,
    ) -> InventoryResult<(Self, Self)> {
        if from == to {
            return Err(InventoryError::invalid_movement(format!(
                "cannot transfer from distributor {from} to itself"
            )));
        }
        let out = Self {
            production_run_id,
            from: Location::Distributor(from),
            to: Location::Warehouse,
            quantity,
            movement_type: MovementType::TransferOut,
            reference_id: Some(reference_id),
        };
        let incoming = Self {
            from: Location::Warehouse,
            to: Location::Distributor(to),
            movement_type: MovementType::TransferIn,
            ..out.clone()
        };
        Ok((out, incoming))
    }

    /// Free-form correction between any two distinct locations.
    pub fn adjustment(
        production_run_id: ProductionRunId,
        from: Location,
        to: Location,
        quantity: Quantity,
        reference_id: ReferenceId,
    ) -> InventoryResult<Self> {
        Self::new(
            production_run_id,
            from,
            to,
            quantity,
            MovementType::Adjustment,
            Some(reference_id),
        )
    }
}

/// A movement recorded in the ledger.
///
/// Immutable once written. `occurred_at` is assigned by the store and is
/// strictly monotonic within a production run's stream, except that all
/// movements of one append batch (e.g. the two legs of a transfer) share a
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: MovementId,
    pub production_run_id: ProductionRunId,
    pub from: Location,
    pub to: Location,
    pub quantity: Quantity,
    pub movement_type: MovementType,
    pub occurred_at: DateTime<Utc>,
    pub reference_id: Option<ReferenceId>,
}

impl InventoryMovement {
    /// Whether this movement touches the given distributor on either side.
    pub fn involves_distributor(&self, id: DistributorId) -> bool {
        self.from.distributor_id() == Some(id) || self.to.distributor_id() == Some(id)
    }
}
