//! Field validation for registrations and amendments
//!
//! Registration checks run in a fixed order and stop at the first failure,
//! so the reported error code is stable for any given request.

use crate::errors::{RegistryError, Result};
use crate::types::{RegisterProductRequest, UpdateProductRequest};
use prodreg_types::{Amount, Currency, ProductHash, ProductType};
use std::fmt;

pub const MAX_ORIGIN_CHARS: usize = 100;
pub const MAX_COMPLIANCE_CHARS: usize = 200;
pub const MAX_LOCATION_CHARS: usize = 100;
pub const MAX_QUALITY_RATING: u32 = 100;

/// Registration fields after every field-level check has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub hash: ProductHash,
    pub origin: String,
    pub production_date: u64,
    pub compliance_data: String,
    pub product_type: ProductType,
    pub quality_rating: u32,
    pub expiry_period: u64,
    pub location: String,
    pub currency: Currency,
    pub min_value: Amount,
    pub max_value: Amount,
    pub batch_size: u64,
}

/// Why an amendment was refused. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateRejection {
    ProductNotFound,
    NotProducer,
    InvalidOrigin,
    InvalidProductionDate,
    InvalidComplianceData,
}

impl fmt::Display for UpdateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UpdateRejection::ProductNotFound => "product not found",
            UpdateRejection::NotProducer => "caller is not the producer",
            UpdateRejection::InvalidOrigin => "invalid origin",
            UpdateRejection::InvalidProductionDate => "invalid production date",
            UpdateRejection::InvalidComplianceData => "invalid compliance data",
        };
        f.write_str(reason)
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub(crate) fn is_valid_origin(origin: &str) -> bool {
    !origin.is_empty() && char_len(origin) <= MAX_ORIGIN_CHARS
}

pub(crate) fn is_valid_compliance_data(data: &str) -> bool {
    char_len(data) <= MAX_COMPLIANCE_CHARS
}

pub(crate) fn is_valid_location(location: &str) -> bool {
    !location.is_empty() && char_len(location) <= MAX_LOCATION_CHARS
}

/// Run the field-level registration checks in order: hash, origin,
/// production date, compliance data, product type, quality rating, expiry
/// period, location, currency, min value, max value, batch size.
pub fn validate_registration(request: &RegisterProductRequest) -> Result<ValidatedRegistration> {
    let hash = ProductHash::from_slice(&request.hash).map_err(|_| RegistryError::InvalidHash)?;

    if !is_valid_origin(&request.origin) {
        return Err(RegistryError::InvalidOrigin);
    }
    if request.production_date == 0 {
        return Err(RegistryError::InvalidProductionDate);
    }
    if !is_valid_compliance_data(&request.compliance_data) {
        return Err(RegistryError::InvalidComplianceData);
    }
    let product_type: ProductType = request
        .product_type
        .parse()
        .map_err(|_| RegistryError::InvalidProductType)?;
    if request.quality_rating > MAX_QUALITY_RATING {
        return Err(RegistryError::InvalidQualityRating);
    }
    if request.expiry_period == 0 {
        return Err(RegistryError::InvalidExpiryPeriod);
    }
    if !is_valid_location(&request.location) {
        return Err(RegistryError::InvalidLocation);
    }
    let currency: Currency = request
        .currency
        .parse()
        .map_err(|_| RegistryError::InvalidCurrency)?;
    if request.min_value == 0 {
        return Err(RegistryError::InvalidMinValue);
    }
    if request.max_value == 0 {
        return Err(RegistryError::InvalidMaxValue);
    }
    if request.batch_size == 0 {
        return Err(RegistryError::InvalidBatchSize);
    }

    Ok(ValidatedRegistration {
        hash,
        origin: request.origin.clone(),
        production_date: request.production_date,
        compliance_data: request.compliance_data.clone(),
        product_type,
        quality_rating: request.quality_rating,
        expiry_period: request.expiry_period,
        location: request.location.clone(),
        currency,
        min_value: request.min_value,
        max_value: request.max_value,
        batch_size: request.batch_size,
    })
}

/// Field-level checks of an amendment. Existence and ownership are checked
/// by the registry before this runs.
pub(crate) fn validate_amendment(
    request: &UpdateProductRequest,
) -> std::result::Result<(), UpdateRejection> {
    if !is_valid_origin(&request.origin) {
        return Err(UpdateRejection::InvalidOrigin);
    }
    if request.production_date == 0 {
        return Err(UpdateRejection::InvalidProductionDate);
    }
    if !is_valid_compliance_data(&request.compliance_data) {
        return Err(UpdateRejection::InvalidComplianceData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterProductRequest {
        RegisterProductRequest {
            hash: vec![0u8; 32],
            origin: "OriginX".into(),
            production_date: 100,
            compliance_data: "Compliant".into(),
            product_type: "organic".into(),
            quality_rating: 90,
            expiry_period: 365,
            location: "LocationY".into(),
            currency: "STX".into(),
            min_value: 50,
            max_value: 1000,
            batch_size: 10,
        }
    }

    fn error_for(mutate: impl FnOnce(&mut RegisterProductRequest)) -> RegistryError {
        let mut request = valid_request();
        mutate(&mut request);
        validate_registration(&request).unwrap_err()
    }

    #[test]
    fn accepts_valid_request() {
        let validated = validate_registration(&valid_request()).unwrap();
        assert_eq!(validated.product_type, ProductType::Organic);
        assert_eq!(validated.currency, Currency::Stx);
        assert_eq!(validated.hash, ProductHash([0u8; 32]));
    }

    #[test]
    fn each_field_maps_to_its_error() {
        assert_eq!(error_for(|r| r.hash = vec![0u8; 31]), RegistryError::InvalidHash);
        assert_eq!(error_for(|r| r.origin.clear()), RegistryError::InvalidOrigin);
        assert_eq!(error_for(|r| r.origin = "o".repeat(101)), RegistryError::InvalidOrigin);
        assert_eq!(
            error_for(|r| r.production_date = 0),
            RegistryError::InvalidProductionDate
        );
        assert_eq!(
            error_for(|r| r.compliance_data = "c".repeat(201)),
            RegistryError::InvalidComplianceData
        );
        assert_eq!(
            error_for(|r| r.product_type = "invalid".into()),
            RegistryError::InvalidProductType
        );
        assert_eq!(
            error_for(|r| r.quality_rating = 101),
            RegistryError::InvalidQualityRating
        );
        assert_eq!(
            error_for(|r| r.expiry_period = 0),
            RegistryError::InvalidExpiryPeriod
        );
        assert_eq!(error_for(|r| r.location.clear()), RegistryError::InvalidLocation);
        assert_eq!(
            error_for(|r| r.currency = "EUR".into()),
            RegistryError::InvalidCurrency
        );
        assert_eq!(error_for(|r| r.min_value = 0), RegistryError::InvalidMinValue);
        assert_eq!(error_for(|r| r.max_value = 0), RegistryError::InvalidMaxValue);
        assert_eq!(error_for(|r| r.batch_size = 0), RegistryError::InvalidBatchSize);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut request = valid_request();
        request.origin = "o".repeat(100);
        request.compliance_data = "c".repeat(200);
        request.location = "l".repeat(100);
        request.quality_rating = 100;
        assert!(validate_registration(&request).is_ok());

        request.compliance_data.clear();
        request.quality_rating = 0;
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn first_failing_check_wins() {
        // Bad origin and bad currency: origin is checked first.
        let err = error_for(|r| {
            r.origin.clear();
            r.currency = "EUR".into();
        });
        assert_eq!(err, RegistryError::InvalidOrigin);

        // Bad hash shadows everything after it.
        let err = error_for(|r| {
            r.hash = vec![1, 2, 3];
            r.batch_size = 0;
            r.product_type = "unknown".into();
        });
        assert_eq!(err, RegistryError::InvalidHash);

        let err = error_for(|r| {
            r.min_value = 0;
            r.max_value = 0;
        });
        assert_eq!(err, RegistryError::InvalidMinValue);
    }

    #[test]
    fn lengths_count_characters() {
        let mut request = valid_request();
        request.origin = "é".repeat(100);
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn amendment_checks() {
        let mut request = UpdateProductRequest {
            id: 0,
            origin: "NewOrigin".into(),
            production_date: 200,
            compliance_data: "NewCompliant".into(),
        };
        assert_eq!(validate_amendment(&request), Ok(()));

        request.origin.clear();
        assert_eq!(validate_amendment(&request), Err(UpdateRejection::InvalidOrigin));

        request.origin = "NewOrigin".into();
        request.production_date = 0;
        assert_eq!(
            validate_amendment(&request),
            Err(UpdateRejection::InvalidProductionDate)
        );

        request.production_date = 1;
        request.compliance_data = "x".repeat(201);
        assert_eq!(
            validate_amendment(&request),
            Err(UpdateRejection::InvalidComplianceData)
        );
    }
}
