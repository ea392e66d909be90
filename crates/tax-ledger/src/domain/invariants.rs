//! # Domain Invariants
//!
//! Properties that must hold at every observation point of the ledger.
//!
//! - Conservation: sum of all balances (accumulator included) == total supply
//! - Split: for every settled transfer, net + tax == amount
//! - Rejection: a rejected call leaves every balance unchanged

use crate::domain::entities::TransferOutcome;
use crate::domain::value_objects::{Address, Balance};
use std::collections::BTreeMap;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Sum of balances equals total supply. An overflowing sum is a violation.
#[must_use]
pub fn check_conservation<I>(balances: I, total_supply: Balance) -> bool
where
    I: IntoIterator<Item = Balance>,
{
    balances
        .into_iter()
        .try_fold(0u128, u128::checked_add)
        .is_some_and(|sum| sum == total_supply)
}

/// The gross amount is fully accounted for by the net and tax legs.
#[must_use]
pub fn check_split_invariant(outcome: &TransferOutcome) -> bool {
    outcome
        .net_amount
        .checked_add(outcome.tax_amount)
        .is_some_and(|sum| sum == outcome.amount)
}

/// Exempt transfers carry no tax.
#[must_use]
pub fn check_exemption_invariant(outcome: &TransferOutcome) -> bool {
    !outcome.exempt || outcome.tax_amount == 0
}

/// Snapshots taken around a rejected call are identical.
#[must_use]
pub fn check_rejection_untouched(
    before: &BTreeMap<Address, Balance>,
    after: &BTreeMap<Address, Balance>,
) -> bool {
    before == after
}

/// Checks the ledger-wide and per-transfer invariants at once.
#[must_use]
pub fn check_all_invariants(
    balances: &BTreeMap<Address, Balance>,
    total_supply: Balance,
    outcome: Option<&TransferOutcome>,
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_conservation(balances.values().copied(), total_supply) {
        let sum = balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b));
        violations.push(InvariantViolation::SupplyMismatch {
            sum,
            total_supply,
        });
    }

    if let Some(outcome) = outcome {
        if !check_split_invariant(outcome) {
            violations.push(InvariantViolation::SplitMismatch {
                amount: outcome.amount,
                net: outcome.net_amount,
                tax: outcome.tax_amount,
            });
        }
        if !check_exemption_invariant(outcome) {
            violations.push(InvariantViolation::ExemptTransferTaxed {
                tax: outcome.tax_amount,
            });
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Balances do not add up to total supply.
    SupplyMismatch { sum: Balance, total_supply: Balance },
    /// Net plus tax differs from the gross amount.
    SplitMismatch { amount: Balance, net: Balance, tax: Balance },
    /// A privileged transfer was taxed.
    ExemptTransferTaxed { tax: Balance },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupplyMismatch { sum, total_supply } => {
                write!(f, "balances sum to {sum}, total supply is {total_supply}")
            }
            Self::SplitMismatch { amount, net, tax } => {
                write!(f, "net {net} + tax {tax} != amount {amount}")
            }
            Self::ExemptTransferTaxed { tax } => {
                write!(f, "exempt transfer charged {tax} tax")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
