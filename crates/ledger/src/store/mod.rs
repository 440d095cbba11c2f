//! Movement store boundary.
//!
//! Defines an infrastructure-facing abstraction for recording and reading
//! per-production-run movement streams without making storage assumptions.
//! Appends are atomic batches; the only delete path is by
//! `(movement_type, reference_id)`.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryMovementStore;
pub use r#trait::MovementStore;
