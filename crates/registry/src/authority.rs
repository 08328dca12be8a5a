//! Verified-authority checks
//!
//! Who may register products is decided outside the registry. The registry
//! only asks an [`AuthorityVerifier`], so the trust source can be a fixed
//! set, an external registry or a role list.

use prodreg_types::Principal;
use std::collections::HashSet;

/// Capability check for principals allowed to register products.
pub trait AuthorityVerifier: Send + Sync {
    fn is_verified_authority(&self, principal: &Principal) -> bool;
}

/// A fixed set of verified authorities.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthoritySet {
    members: HashSet<Principal>,
}

impl StaticAuthoritySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Principal> for StaticAuthoritySet {
    fn from_iter<I: IntoIterator<Item = Principal>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl AuthorityVerifier for StaticAuthoritySet {
    fn is_verified_authority(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }
}

impl<F> AuthorityVerifier for F
where
    F: Fn(&Principal) -> bool + Send + Sync,
{
    fn is_verified_authority(&self, principal: &Principal) -> bool {
        self(principal)
    }
}
