//! # In-Memory Ledger
//!
//! `LedgerStore` backed by an ordered map. Batches are staged against a
//! scratch map and only merged once every leg has validated.

use crate::domain::entities::BalanceMove;
use crate::domain::value_objects::{Address, Balance};
use crate::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use std::collections::BTreeMap;

/// Balances held in process memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: BTreeMap<Address, Balance>,
    total_supply: Balance,
}

impl InMemoryLedger {
    /// Empty ledger with zero supply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds balances. Total supply is the sum of the allocations; an
    /// address may appear only once.
    pub fn with_genesis<I>(allocations: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (Address, Balance)>,
    {
        let mut ledger = Self::new();
        for (account, amount) in allocations {
            if ledger.balances.insert(account, amount).is_some() {
                return Err(StoreError::DuplicateAllocation { account });
            }
            ledger.total_supply = ledger
                .total_supply
                .checked_add(amount)
                .ok_or(StoreError::Overflow { account })?;
        }
        Ok(ledger)
    }

    /// Number of accounts ever credited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl LedgerStore for InMemoryLedger {
    fn balance_of(&self, address: &Address) -> Balance {
        self.balances.get(address).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Balance {
        self.total_supply
    }

    fn apply(&mut self, moves: &[BalanceMove]) -> Result<(), StoreError> {
        let mut staged: BTreeMap<Address, Balance> = BTreeMap::new();

        for mv in moves {
            let available = staged
                .get(&mv.from)
                .copied()
                .unwrap_or_else(|| self.balance_of(&mv.from));
            let debited = available
                .checked_sub(mv.amount)
                .ok_or(StoreError::InsufficientFunds {
                    account: mv.from,
                    required: mv.amount,
                    available,
                })?;
            staged.insert(mv.from, debited);

            let current = staged
                .get(&mv.to)
                .copied()
                .unwrap_or_else(|| self.balance_of(&mv.to));
            let credited = current
                .checked_add(mv.amount)
                .ok_or(StoreError::Overflow { account: mv.to })?;
            staged.insert(mv.to, credited);
        }

        self.balances.extend(staged);
        Ok(())
    }

    fn accounts(&self) -> Vec<(Address, Balance)> {
        self.balances.iter().map(|(a, b)| (*a, *b)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_genesis_sets_supply() {
        let ledger = InMemoryLedger::with_genesis([(addr(1), 600), (addr(2), 400)]).unwrap();
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&addr(1)), 600);
        assert_eq!(ledger.balance_of(&addr(3)), 0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_genesis_duplicate_rejected() {
        let err = InMemoryLedger::with_genesis([(addr(1), 600), (addr(2), 400), (addr(1), 10)]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateAllocation { account: addr(1) });
    }

    #[test]
    fn test_genesis_overflow_rejected() {
        let err = InMemoryLedger::with_genesis([(addr(1), u128::MAX), (addr(2), 1)]).unwrap_err();
        assert!(matches!(err, StoreError::Overflow { .. }));
    }

    #[test]
    fn test_credit_debit() {
        let mut ledger = InMemoryLedger::with_genesis([(addr(1), 100)]).unwrap();
        ledger.credit_debit(addr(1), addr(2), 40).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 60);
        assert_eq!(ledger.balance_of(&addr(2)), 40);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut ledger = InMemoryLedger::with_genesis([(addr(1), 100)]).unwrap();
        let before = ledger.snapshot();

        let err = ledger
            .apply(&[
                BalanceMove::new(addr(1), addr(2), 80),
                BalanceMove::new(addr(1), addr(3), 30),
            ])
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::InsufficientFunds {
                account: addr(1),
                required: 30,
                available: 20
            }
        );
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_batch_sees_its_own_credits() {
        let mut ledger = InMemoryLedger::with_genesis([(addr(1), 100)]).unwrap();
        ledger
            .apply(&[
                BalanceMove::new(addr(1), addr(2), 100),
                BalanceMove::new(addr(2), addr(3), 60),
            ])
            .unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 0);
        assert_eq!(ledger.balance_of(&addr(2)), 40);
        assert_eq!(ledger.balance_of(&addr(3)), 60);
    }

    #[test]
    fn test_zero_balances_persist() {
        let mut ledger = InMemoryLedger::with_genesis([(addr(1), 10)]).unwrap();
        ledger.credit_debit(addr(1), addr(2), 10).unwrap();
        let accounts = ledger.accounts();
        assert!(accounts.contains(&(addr(1), 0)));
        assert!(accounts.contains(&(addr(2), 10)));
    }

    #[test]
    fn test_self_move_is_neutral() {
        let mut ledger = InMemoryLedger::with_genesis([(addr(1), 10)]).unwrap();
        ledger.credit_debit(addr(1), addr(1), 10).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 10);
    }
}
