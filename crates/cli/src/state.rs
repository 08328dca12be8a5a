//! Persisted CLI state: the registry snapshot plus ledger balances.

use anyhow::{Context, Result};
use prodreg_registry::{
    ProductRegistry, RegistryConfig, RegistrySnapshot, SnapshotStore, StaticAuthoritySet,
};
use prodreg_treasury::InMemoryPaymentLedger;
use serde::{Deserialize, Serialize};
use tracing::info;

pub type CliRegistry = ProductRegistry<StaticAuthoritySet, InMemoryPaymentLedger>;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    registry: RegistrySnapshot,
    ledger: InMemoryPaymentLedger,
}

/// Open the registry stored at `store`, or a fresh one built from `config`.
pub fn open(
    store: &SnapshotStore,
    config: RegistryConfig,
    authorities: StaticAuthoritySet,
) -> Result<CliRegistry> {
    let loaded: Option<StateFile> = store
        .load()
        .with_context(|| format!("failed to read state file {}", store.path().display()))?;

    match loaded {
        Some(state) => ProductRegistry::restore(state.registry, authorities, state.ledger)
            .with_context(|| format!("state file {} is invalid", store.path().display())),
        None => {
            info!(path = %store.path().display(), "no state file, starting empty registry");
            Ok(ProductRegistry::new(
                config,
                authorities,
                InMemoryPaymentLedger::new(),
            ))
        }
    }
}

/// Write the registry and ledger back to `store`.
pub fn save(store: &SnapshotStore, registry: &CliRegistry) -> Result<()> {
    let state = StateFile {
        registry: registry.snapshot(),
        ledger: registry.ledger().clone(),
    };
    store
        .save(&state)
        .with_context(|| format!("failed to write state file {}", store.path().display()))
}
