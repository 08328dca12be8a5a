//! Request and context types for registry operations

use prodreg_types::{Amount, BlockHeight, Principal, ProductId};
use serde::{Deserialize, Serialize};

/// What the environment supplies with every mutating call: who is calling
/// and the current logical time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: Principal, block_height: BlockHeight) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

/// Product registration request, exactly as received from the caller.
///
/// Nothing here is trusted; the registry validates every field in a fixed
/// order before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProductRequest {
    pub hash: Vec<u8>,
    pub origin: String,
    pub production_date: u64,
    pub compliance_data: String,
    pub product_type: String,
    pub quality_rating: u32,
    pub expiry_period: u64,
    pub location: String,
    pub currency: String,
    pub min_value: Amount,
    pub max_value: Amount,
    pub batch_size: u64,
}

/// Amendment of the mutable product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub id: ProductId,
    pub origin: String,
    pub production_date: u64,
    pub compliance_data: String,
}
