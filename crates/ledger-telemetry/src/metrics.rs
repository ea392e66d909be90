//! Prometheus metrics for the tax ledger.
//!
//! All metrics follow the naming convention: `tl_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: transfers, collected tax, liquidations, config changes
//! - **Gauge**: current tax rates and limits in basis points

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSFER METRICS
    // =========================================================================

    /// Transfers by outcome (completed / rejected)
    pub static ref TRANSFERS: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_transfers_total", "Total transfers processed"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Tax collected in raw token units, by side (buy / sell / ordinary)
    pub static ref TAX_COLLECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_tax_collected_total", "Tax routed to the accumulator, in raw units"),
        &["side"]
    ).expect("metric creation failed");

    // =========================================================================
    // LIQUIDATION METRICS
    // =========================================================================

    /// Liquidation attempts by outcome (success / reverted)
    pub static ref LIQUIDATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_liquidations_total", "Accumulator liquidation attempts"),
        &["outcome"]
    ).expect("metric creation failed");

    // =========================================================================
    // CONFIGURATION METRICS
    // =========================================================================

    /// Administrative changes by event name
    pub static ref CONFIG_CHANGES: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_config_changes_total", "Administrative configuration changes"),
        &["event"]
    ).expect("metric creation failed");

    /// Current tax rate by side
    pub static ref TAX_RATE: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tl_tax_rate_bps", "Current tax rate in basis points"),
        &["side"]
    ).expect("metric creation failed");

    /// Current cap by kind (max_tx / max_wallet)
    pub static ref LIMIT: IntGaugeVec = IntGaugeVec::new(
        Opts::new("tl_limit_bps", "Current limit in basis points of supply"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSFERS.clone()),
        Box::new(TAX_COLLECTED.clone()),
        Box::new(LIQUIDATIONS.clone()),
        Box::new(CONFIG_CHANGES.clone()),
        Box::new(TAX_RATE.clone()),
        Box::new(LIMIT.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

// =============================================================================
// RECORDING
// =============================================================================

pub fn record_transfer(outcome: &str) {
    TRANSFERS.with_label_values(&[outcome]).inc();
}

/// Amounts above `u64::MAX` saturate.
pub fn record_tax(side: &str, amount: u128) {
    if amount > 0 {
        TAX_COLLECTED
            .with_label_values(&[side])
            .inc_by(u64::try_from(amount).unwrap_or(u64::MAX));
    }
}

pub fn record_liquidation(outcome: &str) {
    LIQUIDATIONS.with_label_values(&[outcome]).inc();
}

pub fn record_config_change(event: &str) {
    CONFIG_CHANGES.with_label_values(&[event]).inc();
}

pub fn set_tax_rate(side: &str, bps: u16) {
    TAX_RATE.with_label_values(&[side]).set(i64::from(bps));
}

pub fn set_limit(kind: &str, bps: u16) {
    LIMIT.with_label_values(&[kind]).set(i64::from(bps));
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_counters_increment() {
        let before = TRANSFERS.with_label_values(&["completed"]).get();
        record_transfer("completed");
        assert!(TRANSFERS.with_label_values(&["completed"]).get() > before);

        let before = TAX_COLLECTED.with_label_values(&["sell"]).get();
        record_tax("sell", 200);
        record_tax("sell", 0);
        assert!(TAX_COLLECTED.with_label_values(&["sell"]).get() >= before + 200);
    }

    #[test]
    fn test_tax_saturates() {
        record_tax("saturating", u128::MAX);
        assert_eq!(TAX_COLLECTED.with_label_values(&["saturating"]).get(), u64::MAX);
    }

    #[test]
    fn test_gauges_and_gather() {
        register_metrics().unwrap();
        set_tax_rate("buy", 150);
        set_limit("max_tx", 1_000);
        record_liquidation("success");
        assert_eq!(TAX_RATE.with_label_values(&["buy"]).get(), 150);

        let text = gather_metrics().unwrap();
        assert!(text.contains("tl_tax_rate_bps"));
        assert!(text.contains("tl_liquidations_total"));
    }
}
