//! # Driving Ports (API - Inbound)
//!
//! The interfaces callers use to drive the ledger.
//!
//! - `TokenLedgerApi`: transfers and views, open to everyone
//! - `LedgerAdminApi`: configuration and liquidation, caller-gated

use crate::domain::entities::TransferOutcome;
use crate::domain::value_objects::{Address, Balance, Bps};
use crate::errors::ServiceError;

/// Transfers and read-only queries.
pub trait TokenLedgerApi {
    /// Moves `amount` from `caller` to `to`, applying tax and limits.
    fn transfer(&self, caller: Address, to: Address, amount: Balance) -> Result<TransferOutcome, ServiceError>;

    /// What `transfer` would do right now, without doing it.
    fn preview_transfer(&self, from: Address, to: Address, amount: Balance) -> Result<TransferOutcome, ServiceError>;

    fn balance_of(&self, address: Address) -> Balance;

    fn total_supply(&self) -> Balance;

    /// Tokens currently held by the tax accumulator.
    fn accumulator_balance(&self) -> Balance;
}

/// Administrative calls. Each takes the caller identity for authorization.
pub trait LedgerAdminApi {
    fn set_tax_active(&self, caller: Address, active: bool) -> Result<(), ServiceError>;

    fn set_tax_rates(&self, caller: Address, buy: Bps, sell: Bps) -> Result<(), ServiceError>;

    /// Rate for transfers that touch no pool; 0 unless configured.
    fn set_ordinary_tax_rate(&self, caller: Address, ordinary: Bps) -> Result<(), ServiceError>;

    fn set_limits(&self, caller: Address, max_tx: Bps, max_wallet: Bps) -> Result<(), ServiceError>;

    fn register_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError>;

    fn unregister_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError>;

    fn set_privileged(&self, caller: Address, account: Address, privileged: bool) -> Result<(), ServiceError>;

    fn set_swap_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError>;

    /// Swaps the whole accumulator balance; returns the reference output.
    fn liquidate(&self, caller: Address, min_output: Balance) -> Result<Balance, ServiceError>;
}
