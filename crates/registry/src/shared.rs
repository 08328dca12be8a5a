//! Thread-safe registry handle
//!
//! All state sits behind one lock. Mutations hold the write lock for their
//! whole duration so no caller ever observes a half-applied registration;
//! reads share the read lock.

use crate::authority::AuthorityVerifier;
use crate::errors::{AuthorityError, Result, UpdateRejected};
use crate::registry::ProductRegistry;
use crate::storage::RegistrySnapshot;
use crate::types::{CallContext, RegisterProductRequest, UpdateProductRequest};
use parking_lot::RwLock;
use prodreg_treasury::PaymentLedger;
use prodreg_types::{Amount, Principal, Product, ProductHash, ProductId, ProductUpdate};
use std::sync::Arc;

/// Cloneable handle to a registry shared between threads.
#[derive(Debug)]
pub struct SharedRegistry<A, L> {
    inner: Arc<RwLock<ProductRegistry<A, L>>>,
}

impl<A, L> Clone for SharedRegistry<A, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, L> SharedRegistry<A, L>
where
    A: AuthorityVerifier,
    L: PaymentLedger,
{
    pub fn new(registry: ProductRegistry<A, L>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn set_authority_contract(
        &self,
        principal: Principal,
    ) -> std::result::Result<(), AuthorityError> {
        self.inner.write().set_authority_contract(principal)
    }

    pub fn set_registration_fee(&self, fee: Amount) -> std::result::Result<(), AuthorityError> {
        self.inner.write().set_registration_fee(fee)
    }

    pub fn register_product(
        &self,
        ctx: &CallContext,
        request: RegisterProductRequest,
    ) -> Result<ProductId> {
        self.inner.write().register_product(ctx, request)
    }

    pub fn update_product(
        &self,
        ctx: &CallContext,
        request: UpdateProductRequest,
    ) -> std::result::Result<(), UpdateRejected> {
        self.inner.write().update_product(ctx, request)
    }

    pub fn get_product(&self, id: ProductId) -> Option<Product> {
        self.inner.read().get_product(id).cloned()
    }

    pub fn get_product_update(&self, id: ProductId) -> Option<ProductUpdate> {
        self.inner.read().get_product_update(id).cloned()
    }

    pub fn get_product_count(&self) -> u64 {
        self.inner.read().get_product_count()
    }

    pub fn check_product_existence(&self, hash: &ProductHash) -> bool {
        self.inner.read().check_product_existence(hash)
    }

    pub fn registration_fee(&self) -> Amount {
        self.inner.read().registration_fee()
    }

    /// Consistent point-in-time copy of the persisted state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.inner.read().snapshot()
    }

    /// Run `f` with shared access to the registry.
    pub fn with_read<R>(&self, f: impl FnOnce(&ProductRegistry<A, L>) -> R) -> R {
        f(&*self.inner.read())
    }
}
