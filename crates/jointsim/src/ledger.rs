//! Ledger implementations.

pub use jointsim_ledger::*;
