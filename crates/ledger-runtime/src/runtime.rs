//! # Service Wiring
//!
//! Assembles the ledger service the runtime drives: in-memory ledger,
//! fixed-rate swap router, events fanned out to the log and to metrics, and
//! the owner-only authorizer.

use crate::adapters::MetricsEventSink;
use tax_ledger::{
    ConfigError, FixedRateRouter, InMemoryLedger, LedgerConfig, LedgerService, OwnerAuthorizer, TracingEventSink,
    TransferEngine,
};
use tracing::info;

/// Events go to the `ledger_events` log target and to Prometheus.
pub type RuntimeEvents = (TracingEventSink, MetricsEventSink);

/// The service type every runtime command works with.
pub type RuntimeService = LedgerService<InMemoryLedger, FixedRateRouter, RuntimeEvents, OwnerAuthorizer>;

/// Builds the service. `swap_rate_bps` is the reference output per token, in
/// basis points, paid by the local router on liquidation.
pub fn build_service(
    config: &LedgerConfig,
    ledger: InMemoryLedger,
    swap_rate_bps: u32,
) -> Result<RuntimeService, ConfigError> {
    let engine = TransferEngine::from_config(
        config,
        ledger,
        FixedRateRouter::new(swap_rate_bps),
        (TracingEventSink, MetricsEventSink),
    )?;
    info!(
        owner = %config.owner,
        swap_rate_bps,
        "Ledger service ready"
    );
    Ok(LedgerService::new(engine, OwnerAuthorizer::new(config.owner)))
}
