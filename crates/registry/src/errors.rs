//! Error types for the product registry
//!
//! Registration failures carry stable numeric codes. Update failures are
//! deliberately opaque: callers only learn that the amendment was rejected.

use prodreg_types::ProductId;
use thiserror::Error;

/// Errors returned by product registration and lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("caller is not a verified authority")]
    NotAuthorized,

    #[error("product hash must be exactly 32 bytes")]
    InvalidHash,

    #[error("origin must be 1-100 characters")]
    InvalidOrigin,

    #[error("production date must be positive")]
    InvalidProductionDate,

    #[error("compliance data must be at most 200 characters")]
    InvalidComplianceData,

    #[error("a product with this hash is already registered")]
    ProductAlreadyExists,

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("authority contract is not configured")]
    AuthorityNotVerified,

    #[error("min value must be positive")]
    InvalidMinValue,

    #[error("max value must be positive")]
    InvalidMaxValue,

    #[error("batch size must be positive")]
    InvalidBatchSize,

    /// Reserved for wire compatibility; updates report [`UpdateRejected`].
    #[error("invalid update parameter")]
    InvalidUpdateParam,

    #[error("product capacity of {0} reached")]
    MaxProductsExceeded(u64),

    #[error("product type must be organic, manufactured or processed")]
    InvalidProductType,

    #[error("quality rating must be at most 100")]
    InvalidQualityRating,

    #[error("expiry period must be positive")]
    InvalidExpiryPeriod,

    #[error("location must be 1-100 characters")]
    InvalidLocation,

    #[error("currency must be STX, USD or BTC")]
    InvalidCurrency,

    #[error("registration fee transfer failed: {0}")]
    PaymentFailed(String),
}

impl RegistryError {
    /// Stable numeric code for this error.
    pub fn code(&self) -> u32 {
        match self {
            RegistryError::NotAuthorized => 100,
            RegistryError::InvalidHash => 101,
            RegistryError::InvalidOrigin => 102,
            RegistryError::InvalidProductionDate => 103,
            RegistryError::InvalidComplianceData => 104,
            RegistryError::ProductAlreadyExists => 105,
            RegistryError::ProductNotFound(_) => 106,
            RegistryError::AuthorityNotVerified => 108,
            RegistryError::InvalidMinValue => 109,
            RegistryError::InvalidMaxValue => 110,
            RegistryError::InvalidBatchSize => 111,
            RegistryError::InvalidUpdateParam => 112,
            RegistryError::MaxProductsExceeded(_) => 113,
            RegistryError::InvalidProductType => 114,
            RegistryError::InvalidQualityRating => 115,
            RegistryError::InvalidExpiryPeriod => 116,
            RegistryError::InvalidLocation => 117,
            RegistryError::InvalidCurrency => 118,
            RegistryError::PaymentFailed(_) => 119,
        }
    }
}

/// Errors from configuring the authority contract or the registration fee.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("authority contract is already set")]
    AlreadySet,

    #[error("the null principal cannot be the authority contract")]
    InvalidPrincipal,

    #[error("authority contract is not configured")]
    NotConfigured,
}

/// A product amendment was refused. The reason is logged, not returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("product update rejected")]
pub struct UpdateRejected;

/// Errors while persisting or restoring registry state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
