//! # Application Layer
//!
//! - `engine`: the transfer pipeline and liquidation over the outbound ports
//! - `service`: locked, authorised facade implementing the driving ports

pub mod engine;
pub mod service;

pub use engine::TransferEngine;
pub use service::{LedgerService, ServiceStats};
