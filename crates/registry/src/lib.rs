//! Product Registry
//!
//! Authority-gated ledger of immutable product records keyed by a unique
//! content hash. Verified authorities register products and pay a
//! registration fee to the configured authority contract; the original
//! producer may later amend origin, production date and compliance data.

pub mod authority;
pub mod config;
pub mod errors;
pub mod registry;
pub mod shared;
pub mod storage;
pub mod types;
pub mod validation;

pub use authority::{AuthorityVerifier, StaticAuthoritySet};
pub use config::RegistryConfig;
pub use errors::*;
pub use registry::ProductRegistry;
pub use shared::SharedRegistry;
pub use storage::{RegistrySnapshot, SnapshotStore};
pub use types::*;
