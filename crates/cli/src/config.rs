//! CLI configuration: optional TOML file, `PRODREG_*` environment
//! variables, then command line overrides.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File as ConfigFile};
use prodreg_registry::{RegistryConfig, StaticAuthoritySet};
use prodreg_types::{Amount, Principal};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "prodreg.toml";
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the registry snapshot and ledger balances.
    pub state_path: PathBuf,
    pub log_level: String,
    /// `pretty`, `compact` or `json`.
    pub log_format: String,
    /// Only applied when a fresh state file is created.
    pub max_products: u64,
    /// Only applied when a fresh state file is created.
    pub registration_fee: Amount,
    /// Principals allowed to register products.
    pub authorities: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let registry = RegistryConfig::default();
        Self {
            state_path: PathBuf::from("prodreg-state.json"),
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            max_products: registry.max_products,
            registration_fee: registry.registration_fee,
            authorities: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from `config_path` (must exist when given) or `./prodreg.toml`
    /// (optional), layered under `PRODREG_*` environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let resolved = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(
            Environment::with_prefix("PRODREG")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("authorities"),
        );

        builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_products == 0 {
            bail!("max_products must be positive");
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            bail!(
                "log_format must be one of {}, got {:?}",
                LOG_FORMATS.join(", "),
                self.log_format
            );
        }
        self.authority_set().map(|_| ())
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            max_products: self.max_products,
            registration_fee: self.registration_fee,
        }
    }

    pub fn authority_set(&self) -> Result<StaticAuthoritySet> {
        self.authorities
            .iter()
            .map(|raw| {
                Principal::parse(raw.trim())
                    .with_context(|| format!("invalid authority principal {raw:?}"))
            })
            .collect()
    }
}
