//! # Error Types
//!
//! All error types for the tax ledger.

use crate::domain::value_objects::{Address, Balance};
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Rejections produced by the transfer engine and its policies.
///
/// Every variant is a local, synchronous rejection of one call. The engine
/// guarantees no state was mutated when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Sender balance is below the requested amount.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Balance, available: Balance },

    /// Amount is above the per-transaction cap.
    #[error("exceeds max transaction: {amount} > {max}")]
    ExceedsMaxTransaction { amount: Balance, max: Balance },

    /// Receiver would end up holding more than the wallet cap.
    #[error("exceeds max wallet: resulting balance {resulting} > {max}")]
    ExceedsMaxWallet { resulting: Balance, max: Balance },

    /// Tax rate above 100%.
    #[error("invalid tax rate: {bps} bps (max 10000)")]
    InvalidRate { bps: u16 },

    /// Limit of zero or above 100%.
    #[error("invalid limit: {bps} bps (must be in 1..=10000)")]
    InvalidLimit { bps: u16 },

    /// Pool returned less than the caller's minimum.
    #[error("slippage exceeded: minimum output {min_output}, actual {actual}")]
    SlippageExceeded { min_output: Balance, actual: Balance },

    /// Pool refused or failed the swap.
    #[error("swap failed: {0}")]
    SwapFailed(String),

    /// Liquidation requested without a configured swap pool.
    #[error("no swap pool configured")]
    NoSwapPool,

    /// The tax accumulator was named as a transfer party.
    #[error("tax accumulator {account} cannot send or receive transfers")]
    AccumulatorTransfer { account: Address },

    /// Attempt to drop the tax accumulator from the privileged set.
    #[error("tax accumulator {account} must stay privileged")]
    AccumulatorPrivilege { account: Address },

    /// Attempt to unregister the pool liquidation sells into.
    #[error("pool {pool} is the active swap pool")]
    SwapPoolInUse { pool: Address },

    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Ledger store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the ledger store port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A debit leg exceeds the staged balance.
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Balance,
        available: Balance,
    },

    /// A credit leg or supply total would overflow.
    #[error("balance overflow for {account}")]
    Overflow { account: Address },

    /// Genesis lists the same account twice.
    #[error("duplicate genesis allocation for {account}")]
    DuplicateAllocation { account: Address },

    /// Backend unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// SWAP ERRORS
// =============================================================================

/// Errors from the swap router port. A router that returns an error has
/// made no changes on its side.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Output would be below the caller's minimum.
    #[error("insufficient output: minimum {min_output}, quoted {actual}")]
    InsufficientOutput { min_output: Balance, actual: Balance },

    /// Pool has no liquidity for this trade.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Router not reachable or not configured.
    #[error("router unavailable: {0}")]
    Unavailable(String),
}

impl From<SwapError> for LedgerError {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::InsufficientOutput { min_output, actual } => {
                LedgerError::SlippageExceeded { min_output, actual }
            }
            other => LedgerError::SwapFailed(other.to_string()),
        }
    }
}

// =============================================================================
// EVENT ERRORS
// =============================================================================

/// Errors from publishing to an event sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Sink rejected or dropped the event.
    #[error("event sink unavailable: {0}")]
    Unavailable(String),

    /// Event could not be encoded.
    #[error("event serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors surfaced by the authorised service facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Caller may not perform the administrative action.
    #[error("unauthorized caller {caller} for {action}")]
    Unauthorized { caller: Address, action: &'static str },

    /// Engine rejection.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A tax rate is above 100%.
    #[error("invalid {field}: {bps} bps exceeds 10000")]
    InvalidRate { field: &'static str, bps: u16 },

    /// A limit is zero or above 100%.
    #[error("invalid {field}: {bps} bps (must be in 1..=10000)")]
    InvalidLimit { field: &'static str, bps: u16 },

    /// Environment variable holds something that is not an address.
    #[error("invalid address in {var}: {value}")]
    InvalidAddress { var: &'static str, value: String },

    /// Environment variable holds something that does not parse.
    #[error("invalid value in {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::ExceedsMaxTransaction {
            amount: 100_001,
            max: 100_000,
        };
        assert_eq!(err.to_string(), "exceeds max transaction: 100001 > 100000");

        let err = LedgerError::InvalidRate { bps: 10_001 };
        assert!(err.to_string().contains("10001"));
    }

    #[test]
    fn test_swap_error_conversion() {
        let err: LedgerError = SwapError::InsufficientOutput {
            min_output: 10,
            actual: 9,
        }
        .into();
        assert_eq!(
            err,
            LedgerError::SlippageExceeded {
                min_output: 10,
                actual: 9
            }
        );

        let err: LedgerError = SwapError::InsufficientLiquidity.into();
        assert!(matches!(err, LedgerError::SwapFailed(_)));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: LedgerError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, LedgerError::Store(_)));
    }

    #[test]
    fn test_service_error_is_transparent() {
        let err: ServiceError = LedgerError::NoSwapPool.into();
        assert_eq!(err.to_string(), "no swap pool configured");

        let err = ServiceError::Unauthorized {
            caller: Address::from_low_u64(5),
            action: "set_limits",
        };
        assert!(err.to_string().contains("unauthorized"));
        assert!(err.to_string().contains("set_limits"));
    }
}
