//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports.

pub mod authorizer;
pub mod event_sink;
pub mod memory_ledger;
pub mod swap_router;

pub use authorizer::*;
pub use event_sink::*;
pub use memory_ledger::*;
pub use swap_router::*;
