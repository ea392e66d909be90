//! # Tax Ledger
//!
//! Fungible-balance ledger that levies a directional tax on transfers into
//! and out of registered liquidity pools, enforces per-transaction and
//! per-wallet caps, and sweeps collected tax through a swap pool.
//!
//! ## Architecture
//!
//! - **Domain**: value objects (Address, Bps), classifier, tax and limit
//!   policies, accumulator, invariants
//! - **Ports**: Inbound (TokenLedgerApi, LedgerAdminApi) and Outbound
//!   (LedgerStore, SwapRouter, EventSink, Authorizer)
//! - **Application**: TransferEngine (pipeline) and LedgerService (facade)
//! - **Adapters**: in-memory ledger, fixed-rate router, event sinks, owner gate
//!
//! ## Transfer pipeline
//!
//! ```text
//! balance -> classify -> limits -> tax -> atomic settlement -> event
//! ```
//!
//! Amounts are raw integer units with 9 implied decimals. Rates and caps are
//! basis points of 10000.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;

pub use adapters::{
    FixedRateRouter, InMemoryEventLog, InMemoryLedger, NoSwapRouter, NullEventSink, OwnerAuthorizer,
    TracingEventSink,
};
pub use application::{LedgerService, ServiceStats, TransferEngine};
pub use config::LedgerConfig;
pub use domain::*;
pub use errors::{ConfigError, EventError, LedgerError, ServiceError, StoreError, SwapError};
pub use events::LedgerEvent;
pub use ports::inbound::{LedgerAdminApi, TokenLedgerApi};
pub use ports::outbound::{AdminAction, Authorizer, EventSink, LedgerStore, SwapRouter};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to assemble and drive a ledger.
pub mod prelude {
    pub use crate::adapters::*;
    pub use crate::application::*;
    pub use crate::config::LedgerConfig;
    pub use crate::domain::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::ports::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_assembly() {
        let config = LedgerConfig::default();
        let ledger = InMemoryLedger::with_genesis([(config.owner, 1_000)]).unwrap();
        let engine = TransferEngine::from_config(&config, ledger, NoSwapRouter, NullEventSink).unwrap();
        let service = LedgerService::new(engine, OwnerAuthorizer::new(config.owner));
        assert_eq!(service.total_supply(), 1_000);
        assert_eq!(service.balance_of(config.owner), 1_000);
    }
}
