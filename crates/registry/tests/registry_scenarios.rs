//! End-to-end registry scenarios
//!
//! Drives the registry through its public API with a real in-memory payment
//! ledger, plus property checks on counting, existence and immutability.

use prodreg_registry::{
    AuthorityError, CallContext, ProductRegistry, RegisterProductRequest, RegistryConfig,
    RegistryError, SnapshotStore, StaticAuthoritySet, UpdateProductRequest, UpdateRejected,
};
use prodreg_treasury::{InMemoryPaymentLedger, MockPaymentLedger, PaymentLedger, TransferRecord};
use prodreg_types::{Principal, ProductHash};
use proptest::prelude::*;

// =============================================================================
// TEST HELPERS
// =============================================================================

const PRODUCER: &str = "ST1TEST";
const AUTHORITY: &str = "ST2TEST";

fn principal(s: &str) -> Principal {
    Principal::parse(s).unwrap()
}

fn request_with_hash(hash: [u8; 32]) -> RegisterProductRequest {
    RegisterProductRequest {
        hash: hash.to_vec(),
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

fn funded_registry(balance: u128) -> ProductRegistry<StaticAuthoritySet, InMemoryPaymentLedger> {
    let mut ledger = InMemoryPaymentLedger::new();
    ledger.credit(&principal(PRODUCER), balance);
    let authorities = [principal(PRODUCER)].into_iter().collect();
    ProductRegistry::new(RegistryConfig::default(), authorities, ledger)
}

fn mock_registry(max_products: u64) -> ProductRegistry<StaticAuthoritySet, MockPaymentLedger> {
    let authorities = [principal(PRODUCER), principal("ST4OTHER")]
        .into_iter()
        .collect();
    let config = RegistryConfig {
        max_products,
        ..RegistryConfig::default()
    };
    let mut registry = ProductRegistry::new(config, authorities, MockPaymentLedger::new());
    registry.set_authority_contract(principal(AUTHORITY)).unwrap();
    registry
}

// =============================================================================
// FEE FLOW
// =============================================================================

#[test]
fn test_fee_is_paid_to_authority_contract() {
    let mut registry = funded_registry(2_000);
    registry.set_authority_contract(principal(AUTHORITY)).unwrap();
    let ctx = CallContext::new(principal(PRODUCER), 5);

    registry.register_product(&ctx, request_with_hash([0; 32])).unwrap();
    registry.set_registration_fee(1_000).unwrap();
    registry.register_product(&ctx, request_with_hash([1; 32])).unwrap();

    assert_eq!(registry.ledger().balance_of(&principal(PRODUCER)), 500);
    assert_eq!(registry.ledger().balance_of(&principal(AUTHORITY)), 1_500);
}

#[test]
fn test_each_registration_records_one_transfer_at_current_fee() {
    let mut registry = mock_registry(10);
    let ctx = CallContext::new(principal(PRODUCER), 1);

    registry.register_product(&ctx, request_with_hash([0; 32])).unwrap();
    registry.set_registration_fee(800).unwrap();
    registry.register_product(&ctx, request_with_hash([1; 32])).unwrap();

    assert_eq!(
        registry.ledger().transfers(),
        &[
            TransferRecord {
                amount: 500,
                from: principal(PRODUCER),
                to: principal(AUTHORITY),
            },
            TransferRecord {
                amount: 800,
                from: principal(PRODUCER),
                to: principal(AUTHORITY),
            },
        ]
    );
}

#[test]
fn test_unfunded_producer_cannot_register() {
    let mut registry = funded_registry(100);
    registry.set_authority_contract(principal(AUTHORITY)).unwrap();
    let ctx = CallContext::new(principal(PRODUCER), 1);

    let err = registry
        .register_product(&ctx, request_with_hash([0; 32]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::PaymentFailed(_)));
    assert_eq!(err.code(), 119);
    assert_eq!(registry.get_product_count(), 0);
    assert!(!registry.check_product_existence(&ProductHash([0; 32])));
    assert_eq!(registry.ledger().balance_of(&principal(PRODUCER)), 100);

    registry.set_registration_fee(0).unwrap();
    assert_eq!(
        registry.register_product(&ctx, request_with_hash([0; 32])),
        Ok(0)
    );
}

// =============================================================================
// AUTHORITY ADMINISTRATION
// =============================================================================

#[test]
fn test_second_authority_contract_is_refused() {
    let mut registry = funded_registry(0);
    registry.set_authority_contract(principal(AUTHORITY)).unwrap();
    assert_eq!(
        registry.set_authority_contract(principal("ST9OTHER")),
        Err(AuthorityError::AlreadySet)
    );
    assert_eq!(registry.authority_contract(), Some(&principal(AUTHORITY)));
}

#[test]
fn test_registration_before_authority_contract_fails() {
    let mut registry = funded_registry(10_000);
    let err = registry
        .register_product(
            &CallContext::new(principal(PRODUCER), 1),
            request_with_hash([0; 32]),
        )
        .unwrap_err();
    assert_eq!(err, RegistryError::AuthorityNotVerified);
}

// =============================================================================
// CAPACITY AND PERSISTENCE
// =============================================================================

#[test]
fn test_capacity_exhaustion_keeps_counter() {
    let mut registry = mock_registry(2);
    let ctx = CallContext::new(principal(PRODUCER), 1);
    registry.register_product(&ctx, request_with_hash([0; 32])).unwrap();
    registry.register_product(&ctx, request_with_hash([1; 32])).unwrap();

    let err = registry
        .register_product(&ctx, request_with_hash([2; 32]))
        .unwrap_err();
    assert_eq!(err, RegistryError::MaxProductsExceeded(2));
    assert_eq!(registry.get_product_count(), 2);
    assert_eq!(registry.ledger().transfers().len(), 2);
}

#[test]
fn test_state_file_round_trip_preserves_uniqueness() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("registry.json"));

    let mut registry = mock_registry(10);
    let ctx = CallContext::new(principal(PRODUCER), 3);
    registry.register_product(&ctx, request_with_hash([7; 32])).unwrap();
    store.save(&registry.snapshot()).unwrap();

    let snapshot = store.load().unwrap().unwrap();
    let authorities: StaticAuthoritySet = [principal(PRODUCER)].into_iter().collect();
    let mut restored =
        ProductRegistry::restore(snapshot, authorities, MockPaymentLedger::new()).unwrap();

    assert_eq!(
        restored.register_product(&ctx, request_with_hash([7; 32])),
        Err(RegistryError::ProductAlreadyExists)
    );
    assert_eq!(
        restored.register_product(&ctx, request_with_hash([8; 32])),
        Ok(1)
    );
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Register { hash_seed: u8, valid: bool },
    Update { id: u64, by_producer: bool },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<bool>())
            .prop_map(|(hash_seed, valid)| Op::Register { hash_seed, valid }),
        (0u64..20, any::<bool>()).prop_map(|(id, by_producer)| Op::Update { id, by_producer }),
    ]
}

proptest! {
    #[test]
    fn count_equals_successful_registrations(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let mut registry = mock_registry(25);
        let mut successes = 0u64;
        let mut registered = Vec::new();

        for (height, op) in ops.into_iter().enumerate() {
            let height = height as u64 + 1;
            match op {
                Op::Register { hash_seed, valid } => {
                    let mut request = request_with_hash([hash_seed; 32]);
                    if !valid {
                        request.quality_rating = 101;
                    }
                    let ctx = CallContext::new(principal(PRODUCER), height);
                    if let Ok(id) = registry.register_product(&ctx, request) {
                        prop_assert_eq!(id, successes);
                        successes += 1;
                        registered.push(ProductHash([hash_seed; 32]));
                    }
                }
                Op::Update { id, by_producer } => {
                    let caller = if by_producer { PRODUCER } else { "ST4OTHER" };
                    let ctx = CallContext::new(principal(caller), height);
                    let before = registry.get_product(id).cloned();
                    let result = registry.update_product(&ctx, UpdateProductRequest {
                        id,
                        origin: format!("Amended{height}"),
                        production_date: height,
                        compliance_data: "Amended".into(),
                    });

                    match (before, result) {
                        (Some(before), Ok(())) => {
                            prop_assert!(by_producer);
                            let after = registry.get_product(id).unwrap();
                            prop_assert_eq!(after.hash, before.hash);
                            prop_assert_eq!(&after.producer, &before.producer);
                            prop_assert_eq!(after.product_type, before.product_type);
                            prop_assert_eq!(after.quality_rating, before.quality_rating);
                            prop_assert_eq!(after.expiry_period, before.expiry_period);
                            prop_assert_eq!(&after.location, &before.location);
                            prop_assert_eq!(after.currency, before.currency);
                            prop_assert_eq!(after.status, before.status);
                            prop_assert_eq!(after.min_value, before.min_value);
                            prop_assert_eq!(after.max_value, before.max_value);
                            prop_assert_eq!(after.batch_size, before.batch_size);
                            prop_assert_eq!(after.timestamp, height);
                        }
                        (Some(before), Err(UpdateRejected)) => {
                            prop_assert!(!by_producer);
                            prop_assert_eq!(registry.get_product(id), Some(&before));
                        }
                        (None, result) => prop_assert_eq!(result, Err(UpdateRejected)),
                    }
                }
            }
        }

        prop_assert_eq!(registry.get_product_count(), successes);
        prop_assert_eq!(registry.ledger().transfers().len() as u64, successes);
        for hash in &registered {
            prop_assert!(registry.check_product_existence(hash));
        }
    }

    #[test]
    fn unregistered_hashes_never_exist(hash in prop::array::uniform32(any::<u8>())) {
        let mut registry = mock_registry(10);
        let ctx = CallContext::new(principal(PRODUCER), 1);
        prop_assert!(!registry.check_product_existence(&ProductHash(hash)));

        let other = if hash == [0u8; 32] { [1u8; 32] } else { [0u8; 32] };
        registry.register_product(&ctx, request_with_hash(other)).unwrap();
        prop_assert!(!registry.check_product_existence(&ProductHash(hash)));
        prop_assert!(registry.check_product_existence(&ProductHash(other)));
    }
}
