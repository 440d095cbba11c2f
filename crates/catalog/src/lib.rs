//! `labelstock-catalog` — production runs and collaborator registries.
//!
//! The surrounding application owns releases, distributors and production
//! runs; the inventory core only consumes them. This crate holds the
//! read-only `ProductionRun` model plus the narrow registry traits through
//! which the workflows reach the collaborators, with in-memory
//! implementations for tests and development.

pub mod production_run;
pub mod registry;

pub use production_run::{AllocationStatus, ProductionRun, ReleaseFormat};
pub use registry::{
    DistributorRegistry, InMemoryDistributorRegistry, InMemoryProductionRunRegistry,
    ProductionRunRegistry,
};
