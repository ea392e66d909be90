//! # Replay Scripts
//!
//! A script is a JSON array of operations applied in order to one service:
//!
//! ```json
//! [
//!   { "op": "set_tax_active", "active": true },
//!   { "op": "set_rates", "buy": 150, "sell": 200 },
//!   { "op": "transfer", "from": "0x…14", "to": "0x…0a", "amount": "10000" },
//!   { "op": "liquidate", "min_output": 0 }
//! ]
//! ```
//!
//! Administrative operations run as the configured owner unless a `caller`
//! is given. A failing operation is reported and the replay continues.

use crate::amount;
use crate::runtime::RuntimeService;
use anyhow::{Context, Result};
use ledger_telemetry::metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tax_ledger::{
    Address, Balance, Bps, LedgerAdminApi, LedgerStore, ServiceError, ServiceStats, TokenLedgerApi,
    TransferOutcome,
};
use tracing::{debug, info};

/// One scripted call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Transfer {
        from: Address,
        to: Address,
        #[serde(deserialize_with = "amount::deserialize")]
        amount: Balance,
    },
    SetTaxActive {
        active: bool,
        #[serde(default)]
        caller: Option<Address>,
    },
    SetRates {
        buy: u16,
        sell: u16,
        #[serde(default)]
        caller: Option<Address>,
    },
    SetOrdinaryRate {
        ordinary: u16,
        #[serde(default)]
        caller: Option<Address>,
    },
    SetLimits {
        max_tx: u16,
        max_wallet: u16,
        #[serde(default)]
        caller: Option<Address>,
    },
    RegisterPool {
        pool: Address,
        #[serde(default)]
        caller: Option<Address>,
    },
    UnregisterPool {
        pool: Address,
        #[serde(default)]
        caller: Option<Address>,
    },
    SetPrivileged {
        account: Address,
        privileged: bool,
        #[serde(default)]
        caller: Option<Address>,
    },
    SetSwapPool {
        pool: Address,
        #[serde(default)]
        caller: Option<Address>,
    },
    Liquidate {
        #[serde(deserialize_with = "amount::deserialize")]
        min_output: Balance,
        #[serde(default)]
        caller: Option<Address>,
    },
}

impl Operation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::SetTaxActive { .. } => "set_tax_active",
            Self::SetRates { .. } => "set_rates",
            Self::SetOrdinaryRate { .. } => "set_ordinary_rate",
            Self::SetLimits { .. } => "set_limits",
            Self::RegisterPool { .. } => "register_pool",
            Self::UnregisterPool { .. } => "unregister_pool",
            Self::SetPrivileged { .. } => "set_privileged",
            Self::SetSwapPool { .. } => "set_swap_pool",
            Self::Liquidate { .. } => "liquidate",
        }
    }
}

/// Reads a script file.
pub fn load_script(path: &Path) -> Result<Vec<Operation>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    parse_script(&raw).with_context(|| format!("parsing script {}", path.display()))
}

pub fn parse_script(raw: &str) -> Result<Vec<Operation>> {
    Ok(serde_json::from_str(raw)?)
}

// =============================================================================
// RESULTS
// =============================================================================

/// Result line for one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TransferOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Balance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// State after the last operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub operations: usize,
    pub failed: usize,
    pub total_supply: Balance,
    pub accumulator_balance: Balance,
    pub total_collected: Balance,
    pub total_liquidated: Balance,
    pub balances: BTreeMap<Address, Balance>,
    pub stats: ServiceStats,
}

// =============================================================================
// REPLAY
// =============================================================================

/// Applies operations to a service, one result per call.
pub struct Replayer<'a> {
    service: &'a RuntimeService,
    owner: Address,
    results: Vec<StepResult>,
}

impl<'a> Replayer<'a> {
    pub fn new(service: &'a RuntimeService, owner: Address) -> Self {
        Self {
            service,
            owner,
            results: Vec::new(),
        }
    }

    /// Runs one operation and records its result.
    pub fn step(&mut self, op: &Operation) -> &StepResult {
        let index = self.results.len();
        debug!(index, op = op.name(), "Replaying operation");
        let result = self.apply(op);
        let step = match result {
            Ok(Applied::Transfer(outcome)) => StepResult::ok(index, op.name(), Some(outcome), None),
            Ok(Applied::Liquidated(output)) => StepResult::ok(index, op.name(), None, Some(output)),
            Ok(Applied::Configured) => StepResult::ok(index, op.name(), None, None),
            Err(err) => {
                match op {
                    Operation::Transfer { .. } => metrics::record_transfer("rejected"),
                    Operation::Liquidate { .. } => metrics::record_liquidation("reverted"),
                    _ => {}
                }
                StepResult::failed(index, op.name(), &err)
            }
        };
        self.results.push(step);
        &self.results[index]
    }

    pub fn run<'o>(&mut self, ops: impl IntoIterator<Item = &'o Operation>) -> &[StepResult] {
        for op in ops {
            self.step(op);
        }
        &self.results
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn summary(&self) -> ReplaySummary {
        let failed = self.results.iter().filter(|r| !r.ok).count();
        let (balances, total_collected, total_liquidated) = self.service.with_engine(|engine| {
            (
                engine.ledger().snapshot(),
                engine.accumulator().total_collected(),
                engine.accumulator().total_liquidated(),
            )
        });
        let summary = ReplaySummary {
            operations: self.results.len(),
            failed,
            total_supply: self.service.total_supply(),
            accumulator_balance: self.service.accumulator_balance(),
            total_collected,
            total_liquidated,
            balances,
            stats: self.service.stats(),
        };
        info!(
            operations = summary.operations,
            failed = summary.failed,
            accumulator_balance = %summary.accumulator_balance,
            "Replay finished"
        );
        summary
    }

    fn apply(&self, op: &Operation) -> Result<Applied, ServiceError> {
        let svc = self.service;
        let as_owner = |caller: &Option<Address>| caller.unwrap_or(self.owner);
        match op {
            Operation::Transfer { from, to, amount } => svc.transfer(*from, *to, *amount).map(Applied::Transfer),
            Operation::SetTaxActive { active, caller } => {
                svc.set_tax_active(as_owner(caller), *active).map(|()| Applied::Configured)
            }
            Operation::SetRates { buy, sell, caller } => svc
                .set_tax_rates(as_owner(caller), Bps(*buy), Bps(*sell))
                .map(|()| Applied::Configured),
            Operation::SetOrdinaryRate { ordinary, caller } => svc
                .set_ordinary_tax_rate(as_owner(caller), Bps(*ordinary))
                .map(|()| Applied::Configured),
            Operation::SetLimits {
                max_tx,
                max_wallet,
                caller,
            } => svc
                .set_limits(as_owner(caller), Bps(*max_tx), Bps(*max_wallet))
                .map(|()| Applied::Configured),
            Operation::RegisterPool { pool, caller } => {
                svc.register_pool(as_owner(caller), *pool).map(|()| Applied::Configured)
            }
            Operation::UnregisterPool { pool, caller } => {
                svc.unregister_pool(as_owner(caller), *pool).map(|()| Applied::Configured)
            }
            Operation::SetPrivileged {
                account,
                privileged,
                caller,
            } => svc
                .set_privileged(as_owner(caller), *account, *privileged)
                .map(|()| Applied::Configured),
            Operation::SetSwapPool { pool, caller } => {
                svc.set_swap_pool(as_owner(caller), *pool).map(|()| Applied::Configured)
            }
            Operation::Liquidate { min_output, caller } => {
                svc.liquidate(as_owner(caller), *min_output).map(Applied::Liquidated)
            }
        }
    }
}

enum Applied {
    Transfer(TransferOutcome),
    Liquidated(Balance),
    Configured,
}

impl StepResult {
    fn ok(index: usize, op: &'static str, outcome: Option<TransferOutcome>, output: Option<Balance>) -> Self {
        Self {
            index,
            op,
            ok: true,
            outcome,
            output,
            error: None,
        }
    }

    fn failed(index: usize, op: &'static str, err: &ServiceError) -> Self {
        Self {
            index,
            op,
            ok: false,
            outcome: None,
            output: None,
            error: Some(err.to_string()),
        }
    }
}
