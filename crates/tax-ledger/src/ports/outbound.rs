//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the transfer engine depends on:
//! - Balance storage (`LedgerStore`)
//! - The external pool's swap endpoint (`SwapRouter`)
//! - Observability (`EventSink`)
//! - Administrative authorization (`Authorizer`, used by the service facade only)

use crate::domain::entities::BalanceMove;
use crate::domain::value_objects::{Address, Balance};
use crate::errors::{EventError, StoreError, SwapError};
use crate::events::LedgerEvent;
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// LEDGER STORE
// =============================================================================

/// Balance storage with atomic batch moves.
///
/// The engine composes these primitives; it never stores balances itself.
pub trait LedgerStore {
    /// Balance of `address` (zero if never credited).
    fn balance_of(&self, address: &Address) -> Balance;

    /// Sum of every balance.
    fn total_supply(&self) -> Balance;

    /// Applies every move or none of them.
    ///
    /// Implementations must validate the whole batch against a staged view
    /// before committing, so a failing leg leaves every balance untouched.
    fn apply(&mut self, moves: &[BalanceMove]) -> Result<(), StoreError>;

    /// Every account ever credited, including those now at zero.
    fn accounts(&self) -> Vec<(Address, Balance)>;

    /// Single debit/credit.
    fn credit_debit(&mut self, from: Address, to: Address, amount: Balance) -> Result<(), StoreError> {
        self.apply(&[BalanceMove::new(from, to, amount)])
    }

    /// Owned copy of every balance, for before/after comparisons.
    fn snapshot(&self) -> BTreeMap<Address, Balance> {
        self.accounts().into_iter().collect()
    }
}

// =============================================================================
// SWAP ROUTER (external pool)
// =============================================================================

/// The external pool's swap endpoint.
///
/// Opaque: the engine assumes nothing about pricing. A call either completes
/// (tokens accepted, reference asset delivered to `recipient`) or returns an
/// error having changed nothing.
pub trait SwapRouter {
    /// Swaps exactly `amount_in` tokens for at least `min_output` of the
    /// reference asset.
    fn swap_exact_tokens_for_reference(
        &mut self,
        amount_in: Balance,
        min_output: Balance,
        recipient: Address,
    ) -> Result<Balance, SwapError>;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Receiver of engine events.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError> {
        (**self).publish(event)
    }
}

/// Fan-out to two sinks. Both are attempted; the first error is returned.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError> {
        let first = self.0.publish(event);
        let second = self.1.publish(event);
        first.and(second)
    }
}

// =============================================================================
// AUTHORIZER
// =============================================================================

/// Administrative operations gated by the service facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdminAction {
    SetTaxActive,
    SetTaxRates,
    SetOrdinaryTaxRate,
    SetLimits,
    RegisterPool,
    UnregisterPool,
    SetPrivileged,
    SetSwapPool,
    Liquidate,
}

impl AdminAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetTaxActive => "set_tax_active",
            Self::SetTaxRates => "set_tax_rates",
            Self::SetOrdinaryTaxRate => "set_ordinary_tax_rate",
            Self::SetLimits => "set_limits",
            Self::RegisterPool => "register_pool",
            Self::UnregisterPool => "unregister_pool",
            Self::SetPrivileged => "set_privileged",
            Self::SetSwapPool => "set_swap_pool",
            Self::Liquidate => "liquidate",
        }
    }
}

/// Decides who may perform administrative actions.
pub trait Authorizer: Send + Sync {
    /// True if `caller` may perform `action`.
    fn is_authorized(&self, caller: &Address, action: AdminAction) -> bool;
}
