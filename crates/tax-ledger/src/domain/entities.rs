//! # Core Domain Entities
//!
//! Classification labels, balance movements and transfer outcomes.

use crate::domain::value_objects::{Address, Balance};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// How an address is treated by the transfer engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Registered liquidity pool.
    Pool,
    /// Exempt from tax and limits. Wins over `Pool` when both apply.
    Privileged,
    /// Everyone else.
    Ordinary,
}

/// Direction of a transfer relative to the pool registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferSide {
    /// Tokens leave a pool.
    Buy,
    /// Tokens enter a pool.
    Sell,
    /// Wallet to wallet.
    Ordinary,
}

impl TransferSide {
    /// Lowercase label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Ordinary => "ordinary",
        }
    }
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// BALANCE MOVE
// =============================================================================

/// A single debit/credit pair applied by the ledger store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMove {
    /// Debited account.
    pub from: Address,
    /// Credited account.
    pub to: Address,
    /// Amount moved.
    pub amount: Balance,
}

impl BalanceMove {
    /// Creates a new move.
    #[must_use]
    pub const fn new(from: Address, to: Address, amount: Balance) -> Self {
        Self { from, to, amount }
    }

    /// The move that undoes this one.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            amount: self.amount,
        }
    }
}

// =============================================================================
// TRANSFER OUTCOME
// =============================================================================

/// The evaluated (and, after settlement, committed) effect of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Gross amount debited from the sender.
    pub amount: Balance,
    /// Amount credited to the receiver.
    pub net_amount: Balance,
    /// Amount credited to the tax accumulator.
    pub tax_amount: Balance,
    /// Pool-relative direction.
    pub side: TransferSide,
    /// True when a privileged party waived tax and limits.
    pub exempt: bool,
}

impl TransferOutcome {
    /// Ledger moves that settle this outcome, zero-amount legs omitted.
    #[must_use]
    pub fn settlement_moves(&self, accumulator: Address) -> Vec<BalanceMove> {
        let mut moves = Vec::with_capacity(2);
        if self.net_amount > 0 {
            moves.push(BalanceMove::new(self.from, self.to, self.net_amount));
        }
        if self.tax_amount > 0 {
            moves.push(BalanceMove::new(self.from, accumulator, self.tax_amount));
        }
        moves
    }
}
