//! # Ledger Service
//!
//! Thread-safe facade over [`TransferEngine`]. Implements both driving ports,
//! serialises every operation behind one lock, and gates administrative calls
//! through an [`Authorizer`].

use super::engine::TransferEngine;
use crate::domain::entities::TransferOutcome;
use crate::domain::value_objects::{Address, Balance, Bps};
use crate::errors::{LedgerError, ServiceError};
use crate::ports::inbound::{LedgerAdminApi, TokenLedgerApi};
use crate::ports::outbound::{AdminAction, Authorizer, EventSink, LedgerStore, SwapRouter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Running counters since the service started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub transfers_completed: u64,
    pub transfers_rejected: u64,
    pub total_tax_collected: Balance,
    pub liquidations: u64,
    pub unauthorized_requests: u64,
}

/// Ledger service: one engine, one lock, one authorizer.
pub struct LedgerService<L, R, E, A> {
    engine: Mutex<TransferEngine<L, R, E>>,
    authorizer: A,
    stats: Mutex<ServiceStats>,
}

impl<L, R, E, A> LedgerService<L, R, E, A>
where
    L: LedgerStore,
    R: SwapRouter,
    E: EventSink,
    A: Authorizer,
{
    pub fn new(engine: TransferEngine<L, R, E>, authorizer: A) -> Self {
        Self {
            engine: Mutex::new(engine),
            authorizer,
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    pub fn stats(&self) -> ServiceStats {
        *self.stats.lock()
    }

    /// Runs `f` against the engine under the lock. For read-only inspection.
    pub fn with_engine<T>(&self, f: impl FnOnce(&TransferEngine<L, R, E>) -> T) -> T {
        f(&*self.engine.lock())
    }

    pub fn into_engine(self) -> TransferEngine<L, R, E> {
        self.engine.into_inner()
    }

    fn authorize(&self, caller: Address, action: AdminAction) -> Result<(), ServiceError> {
        if self.authorizer.is_authorized(&caller, action) {
            return Ok(());
        }
        self.stats.lock().unauthorized_requests += 1;
        warn!(%caller, action = action.as_str(), "Unauthorized admin request");
        Err(ServiceError::Unauthorized {
            caller,
            action: action.as_str(),
        })
    }

    fn admin<T>(
        &self,
        caller: Address,
        action: AdminAction,
        f: impl FnOnce(&mut TransferEngine<L, R, E>) -> Result<T, LedgerError>,
    ) -> Result<T, ServiceError> {
        self.authorize(caller, action)?;
        let mut engine = self.engine.lock();
        Ok(f(&mut *engine)?)
    }
}

impl<L, R, E, A> TokenLedgerApi for LedgerService<L, R, E, A>
where
    L: LedgerStore,
    R: SwapRouter,
    E: EventSink,
    A: Authorizer,
{
    #[instrument(skip(self))]
    fn transfer(&self, caller: Address, to: Address, amount: Balance) -> Result<TransferOutcome, ServiceError> {
        let result = self.engine.lock().transfer(caller, to, amount);
        let mut stats = self.stats.lock();
        match &result {
            Ok(outcome) => {
                stats.transfers_completed += 1;
                stats.total_tax_collected = stats.total_tax_collected.saturating_add(outcome.tax_amount);
            }
            Err(_) => stats.transfers_rejected += 1,
        }
        Ok(result?)
    }

    fn preview_transfer(&self, from: Address, to: Address, amount: Balance) -> Result<TransferOutcome, ServiceError> {
        Ok(self.engine.lock().preview(from, to, amount)?)
    }

    fn balance_of(&self, address: Address) -> Balance {
        self.engine.lock().balance_of(&address)
    }

    fn total_supply(&self) -> Balance {
        self.engine.lock().total_supply()
    }

    fn accumulator_balance(&self) -> Balance {
        self.engine.lock().accumulator_balance()
    }
}

impl<L, R, E, A> LedgerAdminApi for LedgerService<L, R, E, A>
where
    L: LedgerStore,
    R: SwapRouter,
    E: EventSink,
    A: Authorizer,
{
    #[instrument(skip(self))]
    fn set_tax_active(&self, caller: Address, active: bool) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetTaxActive, |engine| {
            engine.set_tax_active(active);
            Ok(())
        })
    }

    #[instrument(skip(self))]
    fn set_tax_rates(&self, caller: Address, buy: Bps, sell: Bps) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetTaxRates, |engine| engine.set_tax_rates(buy, sell))
    }

    #[instrument(skip(self))]
    fn set_ordinary_tax_rate(&self, caller: Address, ordinary: Bps) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetOrdinaryTaxRate, |engine| {
            engine.set_ordinary_tax_rate(ordinary)
        })
    }

    #[instrument(skip(self))]
    fn set_limits(&self, caller: Address, max_tx: Bps, max_wallet: Bps) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetLimits, |engine| engine.set_limits(max_tx, max_wallet))
    }

    #[instrument(skip(self))]
    fn register_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::RegisterPool, |engine| {
            engine.register_pool(pool);
            Ok(())
        })
    }

    #[instrument(skip(self))]
    fn unregister_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::UnregisterPool, |engine| engine.unregister_pool(pool))
    }

    #[instrument(skip(self))]
    fn set_privileged(&self, caller: Address, account: Address, privileged: bool) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetPrivileged, |engine| {
            engine.set_privileged(account, privileged)
        })
    }

    #[instrument(skip(self))]
    fn set_swap_pool(&self, caller: Address, pool: Address) -> Result<(), ServiceError> {
        self.admin(caller, AdminAction::SetSwapPool, |engine| {
            engine.set_swap_pool(pool);
            Ok(())
        })
    }

    #[instrument(skip(self))]
    fn liquidate(&self, caller: Address, min_output: Balance) -> Result<Balance, ServiceError> {
        let (output, swapped) = self.admin(caller, AdminAction::Liquidate, |engine| {
            let before = engine.accumulator().liquidations();
            let output = engine.liquidate(min_output)?;
            Ok((output, engine.accumulator().liquidations() > before))
        })?;
        if swapped {
            self.stats.lock().liquidations += 1;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedRateRouter, InMemoryEventLog, InMemoryLedger, OwnerAuthorizer};
    use std::sync::Arc;

    type TestService = LedgerService<InMemoryLedger, FixedRateRouter, Arc<InMemoryEventLog>, OwnerAuthorizer>;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn owner() -> Address {
        addr(1)
    }

    fn service() -> (TestService, Arc<InMemoryEventLog>) {
        let ledger = InMemoryLedger::with_genesis([(owner(), 600_000), (addr(20), 400_000)]).unwrap();
        let log = Arc::new(InMemoryEventLog::new());
        let mut engine = TransferEngine::new(ledger, FixedRateRouter::new(10_000), Arc::clone(&log), addr(3));
        engine.set_privileged(owner(), true).unwrap();
        log.clear();
        (LedgerService::new(engine, OwnerAuthorizer::new(owner())), log)
    }

    #[test]
    fn test_non_owner_cannot_configure() {
        let (service, log) = service();
        let err = service.set_tax_active(addr(20), true).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Unauthorized {
                caller: addr(20),
                action: "set_tax_active"
            }
        );
        assert!(!service.with_engine(|e| e.tax_policy().is_active()));
        assert!(log.is_empty());
        assert_eq!(service.stats().unauthorized_requests, 1);
    }

    #[test]
    fn test_owner_configures_and_transfers() {
        let (service, _) = service();
        service.set_tax_active(owner(), true).unwrap();
        service.set_tax_rates(owner(), Bps(150), Bps(200)).unwrap();
        service.register_pool(owner(), addr(10)).unwrap();

        let out = service.transfer(addr(20), addr(10), 10_000).unwrap();
        assert_eq!(out.tax_amount, 200);
        assert_eq!(service.accumulator_balance(), 200);
        assert_eq!(service.balance_of(addr(10)), 9_800);
        assert_eq!(service.total_supply(), 1_000_000);

        let stats = service.stats();
        assert_eq!(stats.transfers_completed, 1);
        assert_eq!(stats.total_tax_collected, 200);
    }

    #[test]
    fn test_rejection_counted_and_surfaced() {
        let (service, _) = service();
        let err = service.transfer(addr(30), addr(20), 1).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(service.stats().transfers_rejected, 1);
    }

    #[test]
    fn test_engine_validation_passes_through() {
        let (service, _) = service();
        let err = service.set_limits(owner(), Bps(0), Bps(100)).unwrap_err();
        assert_eq!(err, ServiceError::Ledger(LedgerError::InvalidLimit { bps: 0 }));
    }

    #[test]
    fn test_ordinary_rate_is_owner_only() {
        let (service, _) = service();
        service.set_tax_active(owner(), true).unwrap();
        assert!(service.set_ordinary_tax_rate(addr(20), Bps(100)).is_err());
        service.set_ordinary_tax_rate(owner(), Bps(100)).unwrap();

        let out = service.transfer(addr(20), addr(21), 10_000).unwrap();
        assert_eq!(out.tax_amount, 100);
        assert_eq!(service.balance_of(addr(21)), 9_900);
    }

    #[test]
    fn test_liquidate_is_gated() {
        let (service, _) = service();
        service.set_swap_pool(owner(), addr(10)).unwrap();
        service.set_tax_active(owner(), true).unwrap();
        service.set_tax_rates(owner(), Bps(0), Bps(500)).unwrap();
        service.transfer(addr(20), addr(10), 20_000).unwrap();

        assert!(service.liquidate(addr(20), 0).is_err());
        assert_eq!(service.liquidate(owner(), 1_000).unwrap(), 1_000);
        assert_eq!(service.accumulator_balance(), 0);
        assert_eq!(service.stats().liquidations, 1);
    }

    #[test]
    fn test_zero_output_swap_still_counts() {
        let ledger = InMemoryLedger::with_genesis([(owner(), 600_000), (addr(20), 400_000)]).unwrap();
        let mut engine = TransferEngine::new(ledger, FixedRateRouter::new(0), InMemoryEventLog::new(), addr(3));
        engine.set_privileged(owner(), true).unwrap();
        let service = LedgerService::new(engine, OwnerAuthorizer::new(owner()));
        service.set_swap_pool(owner(), addr(10)).unwrap();
        service.set_tax_active(owner(), true).unwrap();
        service.set_tax_rates(owner(), Bps(0), Bps(500)).unwrap();

        assert_eq!(service.liquidate(owner(), 0).unwrap(), 0);
        assert_eq!(service.stats().liquidations, 0);

        service.transfer(addr(20), addr(10), 20_000).unwrap();
        assert_eq!(service.liquidate(owner(), 0).unwrap(), 0);
        assert_eq!(service.accumulator_balance(), 0);
        assert_eq!(service.stats().liquidations, 1);
        assert_eq!(service.with_engine(|e| e.accumulator().liquidations()), 1);
    }

    #[test]
    fn test_accumulator_guards_surface_as_ledger_errors() {
        let (service, _) = service();
        assert_eq!(
            service.set_privileged(owner(), addr(3), false),
            Err(ServiceError::Ledger(LedgerError::AccumulatorPrivilege { account: addr(3) }))
        );
        assert_eq!(
            service.transfer(addr(20), addr(3), 1),
            Err(ServiceError::Ledger(LedgerError::AccumulatorTransfer { account: addr(3) }))
        );
        assert_eq!(service.stats().transfers_rejected, 1);
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        let (service, _) = service();
        let service = Arc::new(service);
        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    service.transfer(owner(), addr(100 + i), 1_000).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(service.balance_of(owner()), 596_000);
        assert_eq!(service.stats().transfers_completed, 4);
    }
}
