//! # Transfer Engine
//!
//! Runs on every balance movement:
//!
//! ```text
//! transfer(from, to, amount)
//!   1. balance check            -> InsufficientBalance
//!   2. classify (Buy/Sell/Ordinary, privileged?)
//!   3. limit check (non-exempt) -> ExceedsMaxTransaction / ExceedsMaxWallet
//!   4. tax (active, non-exempt, side rate)
//!   5. atomic settlement: from -= amount, to += net, accumulator += tax
//!   6. TransferCompleted event (failure logged, never rolled back)
//! ```
//!
//! Steps 1-4 only read state. Nothing is written until the settlement batch,
//! which the ledger store applies all-or-nothing, so every rejection leaves
//! balances, accumulator totals and policy exactly as they were.

use crate::config::LedgerConfig;
use crate::domain::accumulator::TaxAccumulator;
use crate::domain::classifier::AddressClassifier;
use crate::domain::entities::{BalanceMove, TransferOutcome};
use crate::domain::invariants::check_conservation;
use crate::domain::limits::LimitPolicy;
use crate::domain::tax::TaxPolicy;
use crate::domain::value_objects::{Address, Balance, Bps};
use crate::errors::{ConfigError, LedgerError};
use crate::events::{
    LedgerEvent, LimitsUpdatedPayload, TaxLiquidatedPayload, TaxRatesUpdatedPayload,
    TransferCompletedPayload,
};
use crate::ports::outbound::{EventSink, LedgerStore, SwapRouter};
use tracing::{debug, info, warn};

/// Orchestrates classification, limits, tax and settlement over a ledger store.
pub struct TransferEngine<L, R, E> {
    ledger: L,
    router: R,
    events: E,
    classifier: AddressClassifier,
    tax: TaxPolicy,
    limits: LimitPolicy,
    accumulator: TaxAccumulator,
    swap_pool: Option<Address>,
    proceeds_recipient: Address,
}

impl<L: LedgerStore, R: SwapRouter, E: EventSink> TransferEngine<L, R, E> {
    /// Engine with tax inactive, no caps, and only the accumulator privileged.
    ///
    /// Proceeds from liquidation go to the accumulator address until
    /// [`Self::set_proceeds_recipient`] says otherwise.
    pub fn new(ledger: L, router: R, events: E, accumulator: Address) -> Self {
        let mut classifier = AddressClassifier::new();
        classifier.set_privileged(accumulator, true);
        Self {
            ledger,
            router,
            events,
            classifier,
            tax: TaxPolicy::new(),
            limits: LimitPolicy::new(),
            accumulator: TaxAccumulator::new(accumulator),
            swap_pool: None,
            proceeds_recipient: accumulator,
        }
    }

    /// Engine initialised from a validated configuration.
    pub fn from_config(config: &LedgerConfig, ledger: L, router: R, events: E) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut classifier = AddressClassifier::new();
        for account in config.initial_privileged() {
            classifier.set_privileged(account, true);
        }
        for pool in config.pools.iter().chain(config.swap_pool.iter()) {
            classifier.register_pool(*pool);
        }

        let tax = TaxPolicy::with_rates(
            config.tax_active,
            Bps(config.buy_tax_bps),
            Bps(config.sell_tax_bps),
            Bps(config.ordinary_tax_bps),
        )
        .map_err(|_| ConfigError::InvalidRate {
            field: "tax rates",
            bps: config.buy_tax_bps.max(config.sell_tax_bps).max(config.ordinary_tax_bps),
        })?;
        let limits = LimitPolicy::with_limits(Bps(config.max_tx_bps), Bps(config.max_wallet_bps))
            .map_err(|_| ConfigError::InvalidLimit {
                field: "limits",
                bps: config.max_tx_bps.min(config.max_wallet_bps),
            })?;

        info!(
            owner = %config.owner,
            accumulator = %config.accumulator,
            pools = classifier.pools().count(),
            tax_active = config.tax_active,
            "Transfer engine initialised"
        );

        Ok(Self {
            ledger,
            router,
            events,
            classifier,
            tax,
            limits,
            accumulator: TaxAccumulator::new(config.accumulator),
            swap_pool: config.swap_pool,
            proceeds_recipient: config.proceeds_recipient(),
        })
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    /// Moves `amount` from `from` to `to`, deducting tax into the accumulator.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Balance) -> Result<TransferOutcome, LedgerError> {
        let outcome = match self.evaluate(from, to, amount) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%from, %to, amount = %amount, error = %err, "Transfer rejected");
                return Err(err);
            }
        };

        self.ledger
            .apply(&outcome.settlement_moves(self.accumulator.address()))?;
        self.accumulator.record_collected(outcome.tax_amount);

        debug_assert!(
            check_conservation(
                self.ledger.accounts().into_iter().map(|(_, b)| b),
                self.ledger.total_supply()
            ),
            "conservation violated after settlement"
        );

        debug!(
            %from,
            %to,
            side = %outcome.side,
            net_amount = %outcome.net_amount,
            tax_amount = %outcome.tax_amount,
            exempt = outcome.exempt,
            "Transfer settled"
        );

        self.emit(&LedgerEvent::TransferCompleted(TransferCompletedPayload {
            from,
            to,
            net_amount: outcome.net_amount,
            tax_amount: outcome.tax_amount,
            side: outcome.side,
        }));

        Ok(outcome)
    }

    /// The outcome `transfer` would produce now, without mutating anything.
    pub fn preview(&self, from: Address, to: Address, amount: Balance) -> Result<TransferOutcome, LedgerError> {
        self.evaluate(from, to, amount)
    }

    fn evaluate(&self, from: Address, to: Address, amount: Balance) -> Result<TransferOutcome, LedgerError> {
        // The accumulator moves only through tax collection and liquidation.
        let accumulator = self.accumulator.address();
        if from == accumulator || to == accumulator {
            return Err(LedgerError::AccumulatorTransfer { account: accumulator });
        }

        // 1. Balance
        let available = self.ledger.balance_of(&from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        // 2. Classification
        let side = self.classifier.side(&from, &to);
        let exempt = self.classifier.is_exempt(&from, &to);

        // 3. Tax. Computed ahead of the limit check because the wallet cap
        // applies to the net amount.
        let tax_amount = if exempt { 0 } else { self.tax.tax_for(side, amount) };
        let net_amount = amount.checked_sub(tax_amount).ok_or(LedgerError::Overflow)?;

        // 4. Limits
        if !exempt && amount > 0 {
            let resulting = if from == to {
                available - tax_amount
            } else {
                self.ledger
                    .balance_of(&to)
                    .checked_add(net_amount)
                    .ok_or(LedgerError::Overflow)?
            };
            self.limits
                .check(side, amount, resulting, self.ledger.total_supply())?;
        }

        Ok(TransferOutcome {
            from,
            to,
            amount,
            net_amount,
            tax_amount,
            side,
            exempt,
        })
    }

    // =========================================================================
    // LIQUIDATION
    // =========================================================================

    /// Swaps the accumulator's whole token balance through the swap pool.
    ///
    /// On any router failure, or an output below `min_output`, the token move
    /// is reversed and the accumulator is left untouched.
    pub fn liquidate(&mut self, min_output: Balance) -> Result<Balance, LedgerError> {
        let pool = self.swap_pool.ok_or(LedgerError::NoSwapPool)?;
        let accumulator = self.accumulator.address();
        let amount_in = self.ledger.balance_of(&accumulator);
        if amount_in == 0 {
            debug!("Accumulator empty, nothing to liquidate");
            return Ok(0);
        }

        let forward = BalanceMove::new(accumulator, pool, amount_in);
        self.ledger.apply(&[forward])?;

        let swapped = self
            .router
            .swap_exact_tokens_for_reference(amount_in, min_output, self.proceeds_recipient);

        let output = match swapped {
            Ok(output) if output >= min_output => output,
            Ok(actual) => {
                self.ledger.apply(&[forward.reversed()])?;
                warn!(min_output = %min_output, actual = %actual, "Liquidation reverted: slippage");
                return Err(LedgerError::SlippageExceeded { min_output, actual });
            }
            Err(err) => {
                self.ledger.apply(&[forward.reversed()])?;
                warn!(error = %err, "Liquidation reverted: swap failed");
                return Err(err.into());
            }
        };

        self.accumulator.record_liquidation(amount_in, output);
        info!(
            pool = %pool,
            amount_in = %amount_in,
            output = %output,
            recipient = %self.proceeds_recipient,
            "Tax liquidated"
        );

        self.emit(&LedgerEvent::TaxLiquidated(TaxLiquidatedPayload {
            pool,
            amount_in,
            output,
            recipient: self.proceeds_recipient,
        }));

        Ok(output)
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn set_tax_active(&mut self, active: bool) {
        self.tax.set_active(active);
        info!(active, "Tax status changed");
        self.emit(&LedgerEvent::TaxStatusChanged { active });
    }

    /// Replaces buy and sell rates. `InvalidRate` if either exceeds 10000.
    pub fn set_tax_rates(&mut self, buy: Bps, sell: Bps) -> Result<(), LedgerError> {
        self.tax.set_rates(buy, sell)?;
        info!(%buy, %sell, "Tax rates updated");
        self.emit_rates();
        Ok(())
    }

    /// Rate for wallet-to-wallet transfers (zero by default).
    pub fn set_ordinary_tax_rate(&mut self, ordinary: Bps) -> Result<(), LedgerError> {
        self.tax.set_ordinary_rate(ordinary)?;
        info!(%ordinary, "Ordinary tax rate updated");
        self.emit_rates();
        Ok(())
    }

    /// Replaces both caps. `InvalidLimit` if either is zero.
    pub fn set_limits(&mut self, max_tx: Bps, max_wallet: Bps) -> Result<(), LedgerError> {
        self.limits.set_limits(max_tx, max_wallet)?;
        info!(%max_tx, %max_wallet, "Limits updated");
        self.emit(&LedgerEvent::LimitsUpdated(LimitsUpdatedPayload {
            max_tx,
            max_wallet,
        }));
        Ok(())
    }

    pub fn register_pool(&mut self, pool: Address) {
        if self.classifier.register_pool(pool) {
            info!(%pool, "Pool registered");
            self.emit(&LedgerEvent::PoolRegistered { pool });
        }
    }

    /// `SwapPoolInUse` for the current swap pool; point liquidation
    /// elsewhere first.
    pub fn unregister_pool(&mut self, pool: Address) -> Result<(), LedgerError> {
        if self.swap_pool == Some(pool) {
            return Err(LedgerError::SwapPoolInUse { pool });
        }
        if self.classifier.unregister_pool(pool) {
            info!(%pool, "Pool unregistered");
            self.emit(&LedgerEvent::PoolUnregistered { pool });
        }
        Ok(())
    }

    /// The accumulator is always privileged; revoking it is refused.
    pub fn set_privileged(&mut self, account: Address, privileged: bool) -> Result<(), LedgerError> {
        if !privileged && account == self.accumulator.address() {
            return Err(LedgerError::AccumulatorPrivilege { account });
        }
        if self.classifier.set_privileged(account, privileged) {
            info!(%account, privileged, "Privilege changed");
            self.emit(&LedgerEvent::PrivilegeChanged {
                account,
                privileged,
            });
        }
        Ok(())
    }

    /// Sets the pool liquidation sells into, registering it as a pool too.
    pub fn set_swap_pool(&mut self, pool: Address) {
        self.register_pool(pool);
        if self.swap_pool != Some(pool) {
            self.swap_pool = Some(pool);
            info!(%pool, "Swap pool changed");
            self.emit(&LedgerEvent::SwapPoolChanged { pool });
        }
    }

    pub fn set_proceeds_recipient(&mut self, recipient: Address) {
        self.proceeds_recipient = recipient;
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    pub fn balance_of(&self, address: &Address) -> Balance {
        self.ledger.balance_of(address)
    }

    pub fn total_supply(&self) -> Balance {
        self.ledger.total_supply()
    }

    pub fn accumulator_balance(&self) -> Balance {
        self.ledger.balance_of(&self.accumulator.address())
    }

    /// Absolute per-transaction cap at the current supply.
    pub fn max_transaction_amount(&self) -> Balance {
        self.limits.max_transaction(self.ledger.total_supply())
    }

    /// Absolute wallet cap at the current supply.
    pub fn max_wallet_amount(&self) -> Balance {
        self.limits.max_wallet(self.ledger.total_supply())
    }

    pub fn tax_policy(&self) -> &TaxPolicy {
        &self.tax
    }

    pub fn limit_policy(&self) -> &LimitPolicy {
        &self.limits
    }

    pub fn classifier(&self) -> &AddressClassifier {
        &self.classifier
    }

    pub fn accumulator(&self) -> &TaxAccumulator {
        &self.accumulator
    }

    pub fn swap_pool(&self) -> Option<Address> {
        self.swap_pool
    }

    pub fn proceeds_recipient(&self) -> Address {
        self.proceeds_recipient
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn emit_rates(&self) {
        self.emit(&LedgerEvent::TaxRatesUpdated(TaxRatesUpdatedPayload {
            buy: self.tax.buy_rate(),
            sell: self.tax.sell_rate(),
            ordinary: self.tax.ordinary_rate(),
        }));
    }

    fn emit(&self, event: &LedgerEvent) {
        if let Err(err) = self.events.publish(event) {
            warn!(event = event.name(), error = %err, "Event publish failed");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
