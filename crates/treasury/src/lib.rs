//! Payment layer for the product registry
//!
//! The registry never moves value itself. It asks a [`PaymentLedger`] to
//! transfer the registration fee from the caller to the authority contract
//! and aborts the registration if that transfer fails.

pub mod account_ledger;

pub use account_ledger::{InMemoryPaymentLedger, MockPaymentLedger, PaymentLedger, TransferRecord};
