//! # Metrics Event Sink
//!
//! Feeds ledger events into the Prometheus counters and gauges.

use ledger_telemetry::metrics;
use tax_ledger::{EventError, EventSink, LedgerEvent};

/// Translates each event into metric updates. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsEventSink;

impl EventSink for MetricsEventSink {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError> {
        match event {
            LedgerEvent::TransferCompleted(p) => {
                metrics::record_transfer("completed");
                metrics::record_tax(p.side.as_str(), p.tax_amount);
            }
            LedgerEvent::TaxLiquidated(_) => metrics::record_liquidation("success"),
            LedgerEvent::TaxRatesUpdated(p) => {
                metrics::set_tax_rate("buy", p.buy.get());
                metrics::set_tax_rate("sell", p.sell.get());
                metrics::set_tax_rate("ordinary", p.ordinary.get());
                metrics::record_config_change(event.name());
            }
            LedgerEvent::LimitsUpdated(p) => {
                metrics::set_limit("max_tx", p.max_tx.get());
                metrics::set_limit("max_wallet", p.max_wallet.get());
                metrics::record_config_change(event.name());
            }
            other => metrics::record_config_change(other.name()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_telemetry::metrics::{LIMIT, TAX_COLLECTED, TAX_RATE};
    use tax_ledger::events::{LimitsUpdatedPayload, TaxRatesUpdatedPayload, TransferCompletedPayload};
    use tax_ledger::{Address, Bps, TransferSide};

    #[test]
    fn test_transfer_records_tax_by_side() {
        let before = TAX_COLLECTED.with_label_values(&["buy"]).get();
        MetricsEventSink
            .publish(&LedgerEvent::TransferCompleted(TransferCompletedPayload {
                from: Address::from_low_u64(10),
                to: Address::from_low_u64(20),
                net_amount: 985,
                tax_amount: 15,
                side: TransferSide::Buy,
            }))
            .unwrap();
        assert!(TAX_COLLECTED.with_label_values(&["buy"]).get() >= before + 15);
    }

    #[test]
    fn test_policy_events_set_gauges() {
        MetricsEventSink
            .publish(&LedgerEvent::TaxRatesUpdated(TaxRatesUpdatedPayload {
                buy: Bps(150),
                sell: Bps(200),
                ordinary: Bps(0),
            }))
            .unwrap();
        MetricsEventSink
            .publish(&LedgerEvent::LimitsUpdated(LimitsUpdatedPayload {
                max_tx: Bps(1_000),
                max_wallet: Bps(200),
            }))
            .unwrap();
        assert_eq!(TAX_RATE.with_label_values(&["sell"]).get(), 200);
        assert_eq!(LIMIT.with_label_values(&["max_wallet"]).get(), 200);
    }
}
