//! Implementations of [`LedgerGateway`](jointsim_core::LedgerGateway).
//!
//! [`MemoryLedger`] keeps joint accounts in memory and settles payments the way the on-chain
//! joint-account contract does. [`DeadlineLedger`] wraps any ledger and bounds every call with a
//! timeout.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

mod deadline;
mod memory;

pub use deadline::DeadlineLedger;
pub use memory::{JointAccount, MemoryLedger};
