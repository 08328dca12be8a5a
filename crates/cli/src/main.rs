//! Product registry command line interface
//!
//! Every invocation loads the state file, applies one operation and, if the
//! operation changed anything and succeeded, writes the state back.

mod config;
mod state;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use prodreg_registry::{CallContext, RegisterProductRequest, SnapshotStore, UpdateProductRequest};
use prodreg_treasury::PaymentLedger;
use prodreg_types::{Amount, BlockHeight, Principal, ProductHash, ProductId};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::state::CliRegistry;

#[derive(Parser)]
#[command(name = "prodreg")]
#[command(about = "Product registration ledger", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// State file, overrides `state_path` from the configuration
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Log level, overrides `log_level` from the configuration
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the principal that collects registration fees (once)
    SetAuthority {
        principal: Principal,
    },
    /// Change the registration fee
    SetFee {
        fee: Amount,
    },
    /// Credit a principal's ledger balance
    Fund {
        principal: Principal,
        amount: Amount,
    },
    /// Register a product
    Register(RegisterCommand),
    /// Amend origin, production date and compliance data of a product
    Update(UpdateCommand),
    /// Show a product
    Get {
        id: ProductId,
    },
    /// Show the latest amendment of a product
    UpdateInfo {
        id: ProductId,
    },
    /// Number of registered products
    Count,
    /// Check whether a product hash is registered
    Exists {
        /// Hex-encoded 32-byte hash
        hash: String,
    },
    /// Ledger balance of a principal
    Balance {
        principal: Principal,
    },
    /// Registry parameters
    Info,
    /// Compute the SHA-256 content hash of a file
    Hash {
        path: PathBuf,
    },
}

#[derive(Args)]
struct CallerArgs {
    /// Calling principal
    #[arg(long)]
    caller: Principal,
    /// Current block height
    #[arg(long)]
    height: BlockHeight,
}

impl CallerArgs {
    fn context(&self) -> CallContext {
        CallContext::new(self.caller.clone(), self.height)
    }
}

#[derive(Args)]
struct RegisterCommand {
    #[command(flatten)]
    call: CallerArgs,
    /// Hex-encoded content hash
    #[arg(long)]
    hash: String,
    #[arg(long)]
    origin: String,
    #[arg(long)]
    production_date: u64,
    #[arg(long, default_value = "")]
    compliance_data: String,
    /// organic, manufactured or processed
    #[arg(long)]
    product_type: String,
    #[arg(long)]
    quality_rating: u32,
    #[arg(long)]
    expiry_period: u64,
    #[arg(long)]
    location: String,
    /// STX, USD or BTC
    #[arg(long)]
    currency: String,
    #[arg(long)]
    min_value: Amount,
    #[arg(long)]
    max_value: Amount,
    #[arg(long)]
    batch_size: u64,
}

impl RegisterCommand {
    fn into_request(self) -> Result<RegisterProductRequest> {
        let hash = hex::decode(self.hash.trim()).context("hash must be hexadecimal")?;
        Ok(RegisterProductRequest {
            hash,
            origin: self.origin,
            production_date: self.production_date,
            compliance_data: self.compliance_data,
            product_type: self.product_type,
            quality_rating: self.quality_rating,
            expiry_period: self.expiry_period,
            location: self.location,
            currency: self.currency,
            min_value: self.min_value,
            max_value: self.max_value,
            batch_size: self.batch_size,
        })
    }
}

#[derive(Args)]
struct UpdateCommand {
    #[command(flatten)]
    call: CallerArgs,
    id: ProductId,
    #[arg(long)]
    origin: String,
    #[arg(long)]
    production_date: u64,
    #[arg(long, default_value = "")]
    compliance_data: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(state) = &cli.state {
        config.state_path = state.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    init_logging(&config);

    let store = SnapshotStore::new(&config.state_path);
    let mut registry = state::open(&store, config.registry_config(), config.authority_set()?)?;

    let (output, dirty) = execute(&mut registry, cli.command)?;
    if dirty {
        state::save(&store, &registry)?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        "pretty" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}

/// Apply one command. Returns the JSON output and whether state changed.
fn execute(registry: &mut CliRegistry, command: Commands) -> Result<(Value, bool)> {
    match command {
        Commands::SetAuthority { principal } => {
            registry.set_authority_contract(principal.clone())?;
            Ok((json!({ "authority_contract": principal }), true))
        }
        Commands::SetFee { fee } => {
            registry.set_registration_fee(fee)?;
            Ok((json!({ "registration_fee": fee.to_string() }), true))
        }
        Commands::Fund { principal, amount } => {
            registry.ledger_mut().credit(&principal, amount);
            let balance = registry.ledger().balance_of(&principal);
            Ok((json!({ "principal": principal, "balance": balance.to_string() }), true))
        }
        Commands::Register(cmd) => {
            let ctx = cmd.call.context();
            let request = cmd.into_request()?;
            let id = registry
                .register_product(&ctx, request)
                .map_err(|e| anyhow!("registration failed (code {}): {e}", e.code()))?;
            Ok((json!({ "id": id }), true))
        }
        Commands::Update(cmd) => {
            let ctx = cmd.call.context();
            registry.update_product(
                &ctx,
                UpdateProductRequest {
                    id: cmd.id,
                    origin: cmd.origin,
                    production_date: cmd.production_date,
                    compliance_data: cmd.compliance_data,
                },
            )?;
            Ok((json!({ "updated": cmd.id }), true))
        }
        Commands::Get { id } => {
            let product = registry.product(id).map_err(|e| anyhow!("code {}: {e}", e.code()))?;
            Ok((serde_json::to_value(product)?, false))
        }
        Commands::UpdateInfo { id } => {
            let update = registry.get_product_update(id);
            Ok((serde_json::to_value(update)?, false))
        }
        Commands::Count => Ok((json!({ "count": registry.get_product_count() }), false)),
        Commands::Exists { hash } => {
            let hash = ProductHash::from_hex(hash.trim())?;
            Ok((
                json!({ "hash": hash, "exists": registry.check_product_existence(&hash) }),
                false,
            ))
        }
        Commands::Balance { principal } => {
            let balance = registry.ledger().balance_of(&principal);
            Ok((json!({ "principal": principal, "balance": balance.to_string() }), false))
        }
        Commands::Info => Ok((
            json!({
                "product_count": registry.get_product_count(),
                "max_products": registry.max_products(),
                "registration_fee": registry.registration_fee().to_string(),
                "authority_contract": registry.authority_contract(),
                "verified_authorities": registry.authorities().len(),
            }),
            false,
        )),
        Commands::Hash { path } => {
            let content = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let hash = ProductHash::digest(&content);
            Ok((
                json!({ "hash": hash, "exists": registry.check_product_existence(&hash) }),
                false,
            ))
        }
    }
}
