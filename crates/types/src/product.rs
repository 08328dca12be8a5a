//! Product records as stored by the registry.

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Value moved by the payment layer, in the ledger's smallest unit.
pub type Amount = u128;

/// Logical time supplied by the environment; monotonically increasing.
pub type BlockHeight = u64;

/// Sequential product identifier, assigned from 0.
pub type ProductId = u64;

/// Number of bytes in a product content hash.
pub const PRODUCT_HASH_BYTES: usize = 32;

/// Errors that can occur when building a [`ProductHash`].
#[derive(Debug, thiserror::Error)]
pub enum ProductHashError {
    #[error("product hash must be 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error("product hash is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Content hash that uniquely identifies a product across the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductHash(pub [u8; PRODUCT_HASH_BYTES]);

impl ProductHash {
    /// Build a hash from raw bytes; the slice must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProductHashError> {
        let array: [u8; PRODUCT_HASH_BYTES] = bytes
            .try_into()
            .map_err(|_| ProductHashError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Parse the lowercase or uppercase hex form.
    pub fn from_hex(value: &str) -> Result<Self, ProductHashError> {
        let decoded = hex::decode(value)?;
        Self::from_slice(&decoded)
    }

    /// SHA-256 over arbitrary product content.
    pub fn digest(content: &[u8]) -> Self {
        Self(Sha256::digest(content).into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ProductHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ProductHash> for String {
    fn from(value: ProductHash) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for ProductHash {
    type Error = ProductHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProductHash::from_hex(&value)
    }
}

/// Returned when a wire spelling does not name a known variant.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// How a product came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Organic,
    Manufactured,
    Processed,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::Organic,
        ProductType::Manufactured,
        ProductType::Processed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Organic => "organic",
            ProductType::Manufactured => "manufactured",
            ProductType::Processed => "processed",
        }
    }
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "product type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency the value range of a product is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Stx,
    Usd,
    Btc,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Stx, Currency::Usd, Currency::Btc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Stx => "STX",
            Currency::Usd => "USD",
            Currency::Btc => "BTC",
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "currency",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered product.
///
/// `hash` and `producer` never change after registration. Only `origin`,
/// `production_date`, `compliance_data` and `timestamp` are amended by
/// updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub hash: ProductHash,
    pub origin: String,
    pub production_date: u64,
    pub compliance_data: String,
    /// Block height of the registration or of the latest amendment.
    pub timestamp: BlockHeight,
    pub producer: Principal,
    pub product_type: ProductType,
    /// 0..=100
    pub quality_rating: u32,
    pub expiry_period: u64,
    pub location: String,
    pub currency: Currency,
    /// Always `true` on creation.
    pub status: bool,
    pub min_value: Amount,
    pub max_value: Amount,
    pub batch_size: u64,
}

/// The most recent amendment applied to a product. Only the latest one is
/// retained per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub update_origin: String,
    pub update_production_date: u64,
    pub update_compliance_data: String,
    pub update_timestamp: BlockHeight,
    pub updater: Principal,
}
