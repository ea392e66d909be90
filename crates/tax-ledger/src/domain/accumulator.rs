//! # Tax Accumulator
//!
//! The distinguished account that receives collected tax. Its token balance
//! lives in the ledger store like any other account; this type tracks its
//! identity and lifetime totals.

use crate::domain::value_objects::{Address, Balance};
use serde::{Deserialize, Serialize};

/// Identity and running totals of the tax accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAccumulator {
    address: Address,
    total_collected: Balance,
    total_liquidated: Balance,
    total_proceeds: Balance,
    liquidations: u64,
}

impl TaxAccumulator {
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            total_collected: 0,
            total_liquidated: 0,
            total_proceeds: 0,
            liquidations: 0,
        }
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Tokens ever credited as tax.
    #[must_use]
    pub const fn total_collected(&self) -> Balance {
        self.total_collected
    }

    /// Tokens ever sent to the pool by liquidation.
    #[must_use]
    pub const fn total_liquidated(&self) -> Balance {
        self.total_liquidated
    }

    /// Reference asset ever received from liquidation.
    #[must_use]
    pub const fn total_proceeds(&self) -> Balance {
        self.total_proceeds
    }

    #[must_use]
    pub const fn liquidations(&self) -> u64 {
        self.liquidations
    }

    pub(crate) fn record_collected(&mut self, tax: Balance) {
        self.total_collected = self.total_collected.saturating_add(tax);
    }

    pub(crate) fn record_liquidation(&mut self, tokens: Balance, proceeds: Balance) {
        self.total_liquidated = self.total_liquidated.saturating_add(tokens);
        self.total_proceeds = self.total_proceeds.saturating_add(proceeds);
        self.liquidations += 1;
    }
}
