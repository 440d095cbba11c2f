//! `labelstock-ledger` — the append-only inventory movement ledger.
//!
//! Movements are the single source of truth for all quantity state: every
//! balance shown anywhere is a fold over this log. Movements are immutable
//! once recorded; the only mutation path is bulk deletion by
//! `(movement_type, reference_id)` when the owning business record is
//! deleted (reversal).

pub mod balance;
pub mod movement;
pub mod store;

pub use movement::{InventoryMovement, MovementDraft, MovementType};
pub use store::{InMemoryMovementStore, MovementStore};
