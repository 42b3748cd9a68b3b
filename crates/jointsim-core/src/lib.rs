//! The core `jointsim` library. This crate defines how a synthetic credit network is generated,
//! how it is [provisioned](provision::provision) on a [ledger](ledger::LedgerGateway), and how
//! a [workload driver](workload::WorkloadDriver) measures payment success over time. The most
//! common entry point is [run::run()].

#![warn(unreachable_pub, missing_debug_implementations)]

#[macro_use]
mod ident;

pub mod capacity;
pub mod degree;
pub mod ledger;
pub mod network;
pub mod provision;
pub mod report;
pub mod run;
pub mod spec;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod units;
pub mod workload;

pub use ledger::{Fault, LedgerGateway};
pub use network::{
    types::{FundedLink, Link, Relationship, User, UserId},
    Network, Topology, TopologyError,
};
pub use run::{run, Error, RunReport};
pub use spec::{Spec, SpecError, ValidSpec};
pub use workload::{SuccessSample, WorkloadDriver};
