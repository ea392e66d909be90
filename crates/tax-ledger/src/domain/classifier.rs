//! # Address Classifier
//!
//! Pool registry plus privilege set. Both are plain set lookups; mutations
//! are visible to the very next classification.

use crate::domain::entities::{AccountClass, TransferSide};
use crate::domain::value_objects::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Registered pools and privileged (tax/limit-exempt) accounts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressClassifier {
    pools: BTreeSet<Address>,
    privileged: BTreeSet<Address>,
}

impl AddressClassifier {
    /// Empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `address` as a liquidity pool. Returns false if it already was.
    pub fn register_pool(&mut self, address: Address) -> bool {
        self.pools.insert(address)
    }

    /// Removes `address` from the pool registry. Returns false if it was absent.
    pub fn unregister_pool(&mut self, address: Address) -> bool {
        self.pools.remove(&address)
    }

    /// Grants or revokes privilege. Returns true if the set changed.
    pub fn set_privileged(&mut self, address: Address, privileged: bool) -> bool {
        if privileged {
            self.privileged.insert(address)
        } else {
            self.privileged.remove(&address)
        }
    }

    #[must_use]
    pub fn is_pool(&self, address: &Address) -> bool {
        self.pools.contains(address)
    }

    #[must_use]
    pub fn is_privileged(&self, address: &Address) -> bool {
        self.privileged.contains(address)
    }

    /// Privileged takes priority over Pool.
    #[must_use]
    pub fn classify(&self, address: &Address) -> AccountClass {
        if self.is_privileged(address) {
            AccountClass::Privileged
        } else if self.is_pool(address) {
            AccountClass::Pool
        } else {
            AccountClass::Ordinary
        }
    }

    /// Sell if `to` is a pool, otherwise Buy if `from` is a pool.
    ///
    /// Pool-to-pool therefore counts as a sell.
    #[must_use]
    pub fn side(&self, from: &Address, to: &Address) -> TransferSide {
        if self.is_pool(to) {
            TransferSide::Sell
        } else if self.is_pool(from) {
            TransferSide::Buy
        } else {
            TransferSide::Ordinary
        }
    }

    /// True when either party skips tax and limits.
    #[must_use]
    pub fn is_exempt(&self, from: &Address, to: &Address) -> bool {
        self.is_privileged(from) || self.is_privileged(to)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Address> {
        self.pools.iter()
    }

    pub fn privileged(&self) -> impl Iterator<Item = &Address> {
        self.privileged.iter()
    }
}
