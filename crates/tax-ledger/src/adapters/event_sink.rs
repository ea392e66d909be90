//! # Event Sink Adapters
//!
//! - `InMemoryEventLog`: records events; can be told to fail for tests
//! - `TracingEventSink`: structured log line per event
//! - `NullEventSink`: discards everything

use crate::errors::EventError;
use crate::events::LedgerEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Records every published event in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<LedgerEvent>>,
    failing: AtomicBool,
}

impl InMemoryEventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<LedgerEvent> {
        self.events.lock().last().cloned()
    }

    /// While set, `publish` rejects events without recording them.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventError::Unavailable("event log set to fail".to_string()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Emits each event as an `info!` record under the `ledger_events` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventError> {
        match event {
            LedgerEvent::TransferCompleted(p) => info!(
                target: "ledger_events",
                event = event.name(),
                from = %p.from,
                to = %p.to,
                net_amount = %p.net_amount,
                tax_amount = %p.tax_amount,
                side = %p.side
            ),
            LedgerEvent::TaxLiquidated(p) => info!(
                target: "ledger_events",
                event = event.name(),
                pool = %p.pool,
                amount_in = %p.amount_in,
                output = %p.output,
                recipient = %p.recipient
            ),
            other => info!(target: "ledger_events", event = other.name(), detail = ?other),
        }
        Ok(())
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn publish(&self, _event: &LedgerEvent) -> Result<(), EventError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_in_order() {
        let log = InMemoryEventLog::new();
        log.publish(&LedgerEvent::TaxStatusChanged { active: true }).unwrap();
        log.publish(&LedgerEvent::TaxStatusChanged { active: false }).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(LedgerEvent::TaxStatusChanged { active: false }));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_failing_log_rejects() {
        let log = InMemoryEventLog::new();
        log.set_failing(true);
        assert!(log.publish(&LedgerEvent::TaxStatusChanged { active: true }).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn test_fan_out_reaches_both_sinks() {
        let sink = (InMemoryEventLog::new(), InMemoryEventLog::new());
        sink.0.set_failing(true);
        let result = sink.publish(&LedgerEvent::TaxStatusChanged { active: true });
        assert!(result.is_err());
        assert_eq!(sink.1.len(), 1);
    }

    #[test]
    fn test_tracing_and_null_sinks_accept() {
        let event = LedgerEvent::TaxStatusChanged { active: true };
        assert!(TracingEventSink.publish(&event).is_ok());
        assert!(NullEventSink.publish(&event).is_ok());
    }
}
