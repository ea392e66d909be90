//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for transfer authorization.
//! NO I/O, NO external collaborators.
//!
//! - Dependencies point INWARD only (adapters and the engine depend on this).

pub mod accumulator;
pub mod classifier;
pub mod entities;
pub mod invariants;
pub mod limits;
pub mod tax;
pub mod value_objects;

pub use accumulator::*;
pub use classifier::*;
pub use entities::*;
pub use invariants::*;
pub use limits::*;
pub use tax::*;
pub use value_objects::*;
