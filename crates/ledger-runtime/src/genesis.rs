//! # Genesis
//!
//! Initial allocations (and optionally the ledger configuration) loaded from
//! a JSON file:
//!
//! ```json
//! {
//!   "config": { "tax_active": false, "swap_pool": "0x…0a" },
//!   "allocations": [
//!     { "address": "0x0000000000000000000000000000000000000001", "balance": "1000000000000000" }
//!   ]
//! }
//! ```
//!
//! When `config` is absent the environment configuration is used.

use crate::amount;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tax_ledger::{Address, Balance, InMemoryLedger, LedgerConfig};
use thiserror::Error;

/// Genesis file validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    /// The same address appears twice.
    #[error("duplicate allocation for {0:?}")]
    DuplicateAllocation(Address),

    /// Allocations sum past the representable supply.
    #[error("allocations overflow total supply")]
    SupplyOverflow,
}

/// One initial balance.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Allocation {
    pub address: Address,
    #[serde(deserialize_with = "amount::deserialize")]
    pub balance: Balance,
}

/// Parsed genesis file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Genesis {
    #[serde(default)]
    pub config: Option<LedgerConfig>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Genesis {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading genesis file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing genesis file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let genesis: Self = serde_json::from_str(raw)?;
        genesis.validate()?;
        Ok(genesis)
    }

    /// Rejects duplicate addresses and overflowing supply, the same rules
    /// `InMemoryLedger::with_genesis` enforces.
    pub fn validate(&self) -> Result<(), GenesisError> {
        let mut seen = BTreeSet::new();
        let mut supply: Balance = 0;
        for allocation in &self.allocations {
            if !seen.insert(allocation.address) {
                return Err(GenesisError::DuplicateAllocation(allocation.address));
            }
            supply = supply
                .checked_add(allocation.balance)
                .ok_or(GenesisError::SupplyOverflow)?;
        }
        Ok(())
    }

    /// Sum of all allocations.
    pub fn total_supply(&self) -> Balance {
        self.allocations
            .iter()
            .fold(0, |acc: Balance, a| acc.saturating_add(a.balance))
    }

    /// The file's configuration if present, otherwise `fallback`.
    pub fn config_or(&self, fallback: LedgerConfig) -> LedgerConfig {
        self.config.clone().unwrap_or(fallback)
    }

    pub fn build_ledger(&self) -> Result<InMemoryLedger> {
        let ledger = InMemoryLedger::with_genesis(self.allocations.iter().map(|a| (a.address, a.balance)))?;
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tax_ledger::LedgerStore;

    const GENESIS: &str = r#"{
        "config": { "tax_active": true, "sell_tax_bps": 200 },
        "allocations": [
            { "address": "0x0000000000000000000000000000000000000001", "balance": 600 },
            { "address": "0x0000000000000000000000000000000000000014", "balance": "400" }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let genesis = Genesis::from_json(GENESIS).unwrap();
        assert_eq!(genesis.total_supply(), 1_000);

        let config = genesis.config_or(LedgerConfig::default());
        assert!(config.tax_active);
        assert_eq!(config.sell_tax_bps, 200);
        assert_eq!(config.max_tx_bps, 10_000);

        let ledger = genesis.build_ledger().unwrap();
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&Address::from_low_u64(20)), 400);
    }

    #[test]
    fn test_missing_config_uses_fallback() {
        let genesis = Genesis::from_json(r#"{ "allocations": [] }"#).unwrap();
        let fallback = LedgerConfig {
            buy_tax_bps: 7,
            ..LedgerConfig::default()
        };
        assert_eq!(genesis.config_or(fallback.clone()), fallback);
    }

    #[test]
    fn test_duplicate_allocation_rejected() {
        let raw = r#"{ "allocations": [
            { "address": "0x0000000000000000000000000000000000000001", "balance": 1 },
            { "address": "0x0000000000000000000000000000000000000001", "balance": 2 }
        ] }"#;
        assert!(Genesis::from_json(raw).is_err());
    }

    #[test]
    fn test_ledger_agrees_on_duplicates() {
        let genesis = Genesis {
            config: None,
            allocations: vec![
                Allocation {
                    address: Address::from_low_u64(1),
                    balance: 1,
                },
                Allocation {
                    address: Address::from_low_u64(1),
                    balance: 2,
                },
            ],
        };
        assert!(matches!(
            genesis.validate(),
            Err(GenesisError::DuplicateAllocation(_))
        ));
        let err = genesis.build_ledger().unwrap_err();
        assert!(err.to_string().contains("duplicate genesis allocation"));
    }

    #[test]
    fn test_overflow_rejected() {
        let genesis = Genesis {
            config: None,
            allocations: vec![
                Allocation {
                    address: Address::from_low_u64(1),
                    balance: Balance::MAX,
                },
                Allocation {
                    address: Address::from_low_u64(2),
                    balance: 1,
                },
            ],
        };
        assert_eq!(genesis.validate(), Err(GenesisError::SupplyOverflow));
    }
}
