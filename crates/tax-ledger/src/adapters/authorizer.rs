//! # Owner Authorizer
//!
//! Single-owner gate for administrative calls.

use crate::domain::value_objects::Address;
use crate::ports::outbound::{AdminAction, Authorizer};

/// Admits only the configured owner, for every action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerAuthorizer {
    owner: Address,
}

impl OwnerAuthorizer {
    #[must_use]
    pub const fn new(owner: Address) -> Self {
        Self { owner }
    }

    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }
}

impl Authorizer for OwnerAuthorizer {
    fn is_authorized(&self, caller: &Address, _action: AdminAction) -> bool {
        *caller == self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_owner_is_authorized() {
        let owner = Address::from_low_u64(1);
        let auth = OwnerAuthorizer::new(owner);
        assert!(auth.is_authorized(&owner, AdminAction::SetLimits));
        assert!(auth.is_authorized(&owner, AdminAction::Liquidate));
        assert!(!auth.is_authorized(&Address::from_low_u64(2), AdminAction::SetTaxActive));
    }
}
