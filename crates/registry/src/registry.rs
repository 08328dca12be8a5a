//! Product registry implementation
//!
//! Holds every product record, the latest amendment per product and the
//! hash index used for uniqueness checks. Each operation is one atomic
//! transition: it either applies completely or leaves the state as it was.

use crate::authority::AuthorityVerifier;
use crate::config::RegistryConfig;
use crate::errors::{AuthorityError, RegistryError, Result, StorageError, UpdateRejected};
use crate::storage::RegistrySnapshot;
use crate::types::{CallContext, RegisterProductRequest, UpdateProductRequest};
use crate::validation::{self, UpdateRejection};
use prodreg_treasury::PaymentLedger;
use prodreg_types::{Amount, Principal, Product, ProductHash, ProductId, ProductUpdate};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Product registry
///
/// `products` and `products_by_hash` are two views of the same entity set
/// and are only ever modified together.
#[derive(Debug)]
pub struct ProductRegistry<A, L> {
    next_product_id: ProductId,
    max_products: u64,
    registration_fee: Amount,
    /// Set once; receives registration fees.
    authority_contract: Option<Principal>,
    products: BTreeMap<ProductId, Product>,
    product_updates: BTreeMap<ProductId, ProductUpdate>,
    products_by_hash: HashMap<ProductHash, ProductId>,
    authorities: A,
    ledger: L,
}

impl<A, L> ProductRegistry<A, L>
where
    A: AuthorityVerifier,
    L: PaymentLedger,
{
    /// Create an empty registry
    pub fn new(config: RegistryConfig, authorities: A, ledger: L) -> Self {
        Self {
            next_product_id: 0,
            max_products: config.max_products,
            registration_fee: config.registration_fee,
            authority_contract: None,
            products: BTreeMap::new(),
            product_updates: BTreeMap::new(),
            products_by_hash: HashMap::new(),
            authorities,
            ledger,
        }
    }

    /// Configure the principal that collects registration fees. Allowed once.
    pub fn set_authority_contract(
        &mut self,
        principal: Principal,
    ) -> std::result::Result<(), AuthorityError> {
        if principal.is_null() {
            warn!(target: "registry", "refusing null principal as authority contract");
            return Err(AuthorityError::InvalidPrincipal);
        }
        if let Some(existing) = &self.authority_contract {
            warn!(target: "registry", %existing, requested = %principal, "authority contract already set");
            return Err(AuthorityError::AlreadySet);
        }

        info!(target: "registry", authority = %principal, "authority contract set");
        self.authority_contract = Some(principal);
        Ok(())
    }

    /// Replace the registration fee. Requires a configured authority contract.
    pub fn set_registration_fee(&mut self, fee: Amount) -> std::result::Result<(), AuthorityError> {
        if self.authority_contract.is_none() {
            return Err(AuthorityError::NotConfigured);
        }
        info!(target: "registry", old = self.registration_fee, new = fee, "registration fee changed");
        self.registration_fee = fee;
        Ok(())
    }

    /// Register a product and charge the registration fee.
    ///
    /// Checks run in this order and the first failure is returned: capacity,
    /// field validation, caller authority, hash uniqueness, authority
    /// contract. The fee transfer happens before anything is stored; if it
    /// fails nothing changes.
    pub fn register_product(
        &mut self,
        ctx: &CallContext,
        request: RegisterProductRequest,
    ) -> Result<ProductId> {
        match self.try_register(ctx, request) {
            Ok(id) => Ok(id),
            Err(err) => {
                warn!(
                    target: "registry",
                    caller = %ctx.caller,
                    code = err.code(),
                    "registration rejected: {err}"
                );
                Err(err)
            }
        }
    }

    fn try_register(
        &mut self,
        ctx: &CallContext,
        request: RegisterProductRequest,
    ) -> Result<ProductId> {
        if self.next_product_id >= self.max_products {
            return Err(RegistryError::MaxProductsExceeded(self.max_products));
        }

        let fields = validation::validate_registration(&request)?;

        if !self.authorities.is_verified_authority(&ctx.caller) {
            return Err(RegistryError::NotAuthorized);
        }
        if self.products_by_hash.contains_key(&fields.hash) {
            return Err(RegistryError::ProductAlreadyExists);
        }
        let authority = self
            .authority_contract
            .as_ref()
            .ok_or(RegistryError::AuthorityNotVerified)?;

        self.ledger
            .transfer(self.registration_fee, &ctx.caller, authority)
            .map_err(|e| RegistryError::PaymentFailed(e.to_string()))?;

        let id = self.next_product_id;
        let product = Product {
            hash: fields.hash,
            origin: fields.origin,
            production_date: fields.production_date,
            compliance_data: fields.compliance_data,
            timestamp: ctx.block_height,
            producer: ctx.caller.clone(),
            product_type: fields.product_type,
            quality_rating: fields.quality_rating,
            expiry_period: fields.expiry_period,
            location: fields.location,
            currency: fields.currency,
            status: true,
            min_value: fields.min_value,
            max_value: fields.max_value,
            batch_size: fields.batch_size,
        };

        self.products_by_hash.insert(product.hash, id);
        self.products.insert(id, product);
        self.next_product_id += 1;

        info!(
            target: "registry",
            id,
            hash = %fields.hash,
            producer = %ctx.caller,
            fee = self.registration_fee,
            "product registered"
        );
        Ok(id)
    }

    /// Amend origin, production date and compliance data of a product.
    ///
    /// Only the original producer may do this. Every failure collapses into
    /// [`UpdateRejected`].
    pub fn update_product(
        &mut self,
        ctx: &CallContext,
        request: UpdateProductRequest,
    ) -> std::result::Result<(), UpdateRejected> {
        if let Err(reason) = self.try_update(ctx, &request) {
            debug!(
                target: "registry",
                id = request.id,
                caller = %ctx.caller,
                %reason,
                "update rejected"
            );
            return Err(UpdateRejected);
        }
        info!(target: "registry", id = request.id, updater = %ctx.caller, "product updated");
        Ok(())
    }

    fn try_update(
        &mut self,
        ctx: &CallContext,
        request: &UpdateProductRequest,
    ) -> std::result::Result<(), UpdateRejection> {
        let product = self
            .products
            .get_mut(&request.id)
            .ok_or(UpdateRejection::ProductNotFound)?;
        if product.producer != ctx.caller {
            return Err(UpdateRejection::NotProducer);
        }
        validation::validate_amendment(request)?;

        product.origin = request.origin.clone();
        product.production_date = request.production_date;
        product.compliance_data = request.compliance_data.clone();
        product.timestamp = ctx.block_height;

        self.product_updates.insert(
            request.id,
            ProductUpdate {
                update_origin: request.origin.clone(),
                update_production_date: request.production_date,
                update_compliance_data: request.compliance_data.clone(),
                update_timestamp: ctx.block_height,
                updater: ctx.caller.clone(),
            },
        );
        Ok(())
    }

    /// Look up a product by id.
    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Like [`get_product`](Self::get_product), with a coded error when absent.
    pub fn product(&self, id: ProductId) -> Result<&Product> {
        self.products
            .get(&id)
            .ok_or(RegistryError::ProductNotFound(id))
    }

    /// Latest amendment of a product, if it was ever updated.
    pub fn get_product_update(&self, id: ProductId) -> Option<&ProductUpdate> {
        self.product_updates.get(&id)
    }

    /// Number of successful registrations.
    pub fn get_product_count(&self) -> u64 {
        self.next_product_id
    }

    /// Whether a product with this hash was ever registered.
    pub fn check_product_existence(&self, hash: &ProductHash) -> bool {
        self.products_by_hash.contains_key(hash)
    }

    pub fn product_id_by_hash(&self, hash: &ProductHash) -> Option<ProductId> {
        self.products_by_hash.get(hash).copied()
    }

    pub fn registration_fee(&self) -> Amount {
        self.registration_fee
    }

    pub fn authority_contract(&self) -> Option<&Principal> {
        self.authority_contract.as_ref()
    }

    pub fn max_products(&self) -> u64 {
        self.max_products
    }

    pub fn authorities(&self) -> &A {
        &self.authorities
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Split the registry into its persisted state and its collaborators.
    pub fn into_parts(self) -> (RegistrySnapshot, A, L) {
        let snapshot = self.snapshot();
        (snapshot, self.authorities, self.ledger)
    }

    /// Capture the persisted state. The hash index is not stored; it is
    /// rebuilt from the products on restore.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            next_product_id: self.next_product_id,
            max_products: self.max_products,
            registration_fee: self.registration_fee,
            authority_contract: self.authority_contract.clone(),
            products: self.products.clone(),
            product_updates: self.product_updates.clone(),
        }
    }

    /// Rebuild a registry from a snapshot, rejecting any snapshot that
    /// breaks hash uniqueness or id sequencing.
    pub fn restore(
        snapshot: RegistrySnapshot,
        authorities: A,
        ledger: L,
    ) -> std::result::Result<Self, StorageError> {
        let mut products_by_hash = HashMap::with_capacity(snapshot.products.len());
        for (id, product) in &snapshot.products {
            if *id >= snapshot.next_product_id {
                return Err(StorageError::CorruptSnapshot(format!(
                    "product id {id} is not below the id counter {}",
                    snapshot.next_product_id
                )));
            }
            if let Some(previous) = products_by_hash.insert(product.hash, *id) {
                return Err(StorageError::CorruptSnapshot(format!(
                    "hash {} is shared by products {previous} and {id}",
                    product.hash
                )));
            }
        }
        if snapshot.products.len() as u64 != snapshot.next_product_id {
            return Err(StorageError::CorruptSnapshot(format!(
                "{} products stored but id counter is {}",
                snapshot.products.len(),
                snapshot.next_product_id
            )));
        }
        if let Some(id) = snapshot
            .product_updates
            .keys()
            .find(|id| !snapshot.products.contains_key(id))
        {
            return Err(StorageError::CorruptSnapshot(format!(
                "update recorded for unknown product {id}"
            )));
        }
        if snapshot
            .authority_contract
            .as_ref()
            .is_some_and(Principal::is_null)
        {
            return Err(StorageError::CorruptSnapshot(
                "authority contract is the null principal".to_string(),
            ));
        }

        Ok(Self {
            next_product_id: snapshot.next_product_id,
            max_products: snapshot.max_products,
            registration_fee: snapshot.registration_fee,
            authority_contract: snapshot.authority_contract,
            products: snapshot.products,
            product_updates: snapshot.product_updates,
            products_by_hash,
            authorities,
            ledger,
        })
    }
}
