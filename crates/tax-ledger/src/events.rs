//! # Event Schema
//!
//! Events emitted by the transfer engine for the observability collaborator.
//! Publishing is fire-and-forget: a sink failure never rolls back the
//! operation that produced the event.

use crate::domain::entities::TransferSide;
use crate::domain::value_objects::{Address, Balance, Bps};
use serde::{Deserialize, Serialize};

// =============================================================================
// PAYLOADS
// =============================================================================

/// A settled transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompletedPayload {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Amount credited to the receiver.
    pub net_amount: Balance,
    /// Amount credited to the accumulator.
    pub tax_amount: Balance,
    /// Pool-relative direction.
    pub side: TransferSide,
}

/// New tax rates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRatesUpdatedPayload {
    pub buy: Bps,
    pub sell: Bps,
    pub ordinary: Bps,
}

/// New caps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsUpdatedPayload {
    pub max_tx: Bps,
    pub max_wallet: Bps,
}

/// A completed liquidation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLiquidatedPayload {
    /// Pool that received the tokens.
    pub pool: Address,
    /// Tokens swapped.
    pub amount_in: Balance,
    /// Reference asset received.
    pub output: Balance,
    /// Who received the reference asset.
    pub recipient: Address,
}

// =============================================================================
// EVENT ENVELOPE
// =============================================================================

/// Every event the engine can emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    TransferCompleted(TransferCompletedPayload),
    TaxStatusChanged { active: bool },
    TaxRatesUpdated(TaxRatesUpdatedPayload),
    LimitsUpdated(LimitsUpdatedPayload),
    PoolRegistered { pool: Address },
    PoolUnregistered { pool: Address },
    SwapPoolChanged { pool: Address },
    PrivilegeChanged { account: Address, privileged: bool },
    TaxLiquidated(TaxLiquidatedPayload),
}

impl LedgerEvent {
    /// Stable snake_case name, matching the serialized tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TransferCompleted(_) => "transfer_completed",
            Self::TaxStatusChanged { .. } => "tax_status_changed",
            Self::TaxRatesUpdated(_) => "tax_rates_updated",
            Self::LimitsUpdated(_) => "limits_updated",
            Self::PoolRegistered { .. } => "pool_registered",
            Self::PoolUnregistered { .. } => "pool_unregistered",
            Self::SwapPoolChanged { .. } => "swap_pool_changed",
            Self::PrivilegeChanged { .. } => "privilege_changed",
            Self::TaxLiquidated(_) => "tax_liquidated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_event_json_shape() {
        let event = LedgerEvent::TransferCompleted(TransferCompletedPayload {
            from: Address::from_low_u64(1),
            to: Address::from_low_u64(2),
            net_amount: 9_800,
            tax_amount: 200,
            side: TransferSide::Sell,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "transfer_completed");
        assert_eq!(json["tax_amount"], 200);
        assert_eq!(json["side"], "sell");
        assert_eq!(json["event"], event.name());
    }

    #[test]
    fn test_struct_variant_tag() {
        let event = LedgerEvent::TaxStatusChanged { active: true };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "tax_status_changed");
        assert_eq!(json["active"], true);

        let back: LedgerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
