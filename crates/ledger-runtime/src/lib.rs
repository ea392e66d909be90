//! # Ledger Runtime
//!
//! Host for the tax ledger outside of tests.
//!
//! ## Modules
//!
//! - `genesis` - Initial allocations and optional config from JSON
//! - `script` - Scripted operations and the replayer
//! - `runtime` - Service wiring (router, event fan-out, authorizer)
//! - `adapters` - Port implementations owned by the runtime
//!
//! ## Replay flow
//!
//! ```text
//! env config ─┐
//!             ├─→ build_service ─→ Replayer ─→ JSON line per op ─→ summary
//! genesis ────┘
//! ```

pub mod adapters;
pub mod amount;
pub mod genesis;
pub mod runtime;
pub mod script;

pub use genesis::{Allocation, Genesis, GenesisError};
pub use runtime::{build_service, RuntimeService};
pub use script::{load_script, parse_script, Operation, ReplaySummary, Replayer, StepResult};
