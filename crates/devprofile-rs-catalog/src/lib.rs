// crates/devprofile-rs-catalog/src/lib.rs

#![doc = "Relational catalog of device descriptions."]
#![doc = ""]
#![doc = "Documents of either grammar are parsed into the canonical model,"]
#![doc = "decomposed into SQLite rows, reconstructed on demand and graded against"]
#![doc = "their source by the fidelity engine."]

// --- Internal Modules ---
mod catalog;
mod retry;
mod store;

// --- Public Modules ---
pub mod container;
pub mod dispatch;
pub mod error;
pub mod pqa;

// --- Public API Exports ---
pub use catalog::{Catalog, MemberOutcome, checksum};
pub use error::{CatalogError, ContainerError, FidelityEngineError, Side, StoreError};
pub use pqa::{CancelToken, DiffKind, DiffRecord, QualityReport};
pub use store::Store;
