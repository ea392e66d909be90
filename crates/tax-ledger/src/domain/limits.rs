//! # Limit Policy
//!
//! Per-transaction and per-wallet caps, both expressed as a fraction of the
//! total supply observed at evaluation time.

use crate::domain::entities::TransferSide;
use crate::domain::value_objects::{Balance, Bps};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};

/// Transaction and wallet caps in basis points of total supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitPolicy {
    max_tx: Bps,
    max_wallet: Bps,
}

impl Default for LimitPolicy {
    /// Both caps at 100% of supply, i.e. no effective limit.
    fn default() -> Self {
        Self {
            max_tx: Bps::MAX,
            max_wallet: Bps::MAX,
        }
    }
}

impl LimitPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a policy, validating both caps.
    pub fn with_limits(max_tx: Bps, max_wallet: Bps) -> Result<Self, LedgerError> {
        let mut policy = Self::new();
        policy.set_limits(max_tx, max_wallet)?;
        Ok(policy)
    }

    /// Replaces both caps. Neither changes if either is zero or above 100%.
    pub fn set_limits(&mut self, max_tx: Bps, max_wallet: Bps) -> Result<(), LedgerError> {
        validate_limit(max_tx)?;
        validate_limit(max_wallet)?;
        self.max_tx = max_tx;
        self.max_wallet = max_wallet;
        Ok(())
    }

    #[must_use]
    pub const fn max_tx_bps(&self) -> Bps {
        self.max_tx
    }

    #[must_use]
    pub const fn max_wallet_bps(&self) -> Bps {
        self.max_wallet
    }

    /// Absolute transaction cap for the given supply.
    #[must_use]
    pub fn max_transaction(&self, total_supply: Balance) -> Balance {
        self.max_tx.of(total_supply)
    }

    /// Absolute holding cap for the given supply.
    #[must_use]
    pub fn max_wallet(&self, total_supply: Balance) -> Balance {
        self.max_wallet.of(total_supply)
    }

    /// Validates a non-exempt transfer.
    ///
    /// `resulting_balance` is what the receiver will hold after settlement.
    /// The wallet cap does not apply to sells: the receiver is the pool.
    pub fn check(
        &self,
        side: TransferSide,
        amount: Balance,
        resulting_balance: Balance,
        total_supply: Balance,
    ) -> Result<(), LedgerError> {
        let max_tx = self.max_transaction(total_supply);
        if amount > max_tx {
            return Err(LedgerError::ExceedsMaxTransaction {
                amount,
                max: max_tx,
            });
        }

        if side != TransferSide::Sell {
            let max_wallet = self.max_wallet(total_supply);
            if resulting_balance > max_wallet {
                return Err(LedgerError::ExceedsMaxWallet {
                    resulting: resulting_balance,
                    max: max_wallet,
                });
            }
        }

        Ok(())
    }
}

fn validate_limit(limit: Bps) -> Result<(), LedgerError> {
    if limit.get() == 0 || !limit.is_valid() {
        Err(LedgerError::InvalidLimit { bps: limit.get() })
    } else {
        Ok(())
    }
}
