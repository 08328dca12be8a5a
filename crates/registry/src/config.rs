//! Registry configuration

use prodreg_types::Amount;
use serde::{Deserialize, Serialize};

/// Default ceiling on the number of products.
pub const DEFAULT_MAX_PRODUCTS: u64 = 10_000;
/// Default fee charged per successful registration.
pub const DEFAULT_REGISTRATION_FEE: Amount = 500;

/// Initial parameters of a fresh registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registrations are refused once this many products exist.
    pub max_products: u64,
    /// Fee before any `set_registration_fee` call.
    pub registration_fee: Amount,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_products: DEFAULT_MAX_PRODUCTS,
            registration_fee: DEFAULT_REGISTRATION_FEE,
        }
    }
}
