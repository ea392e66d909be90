//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the transfer engine and the outside world.
//!
//! - **Driving Ports (Inbound)**: `TokenLedgerApi`, `LedgerAdminApi`
//! - **Driven Ports (Outbound)**: `LedgerStore`, `SwapRouter`, `EventSink`, `Authorizer`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
