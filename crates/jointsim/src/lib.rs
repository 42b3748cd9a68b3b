//! `jointsim` measures how often direct payments succeed on a credit network of joint accounts.
//! It generates a synthetic population whose relationship degrees follow a power law, funds every
//! relationship with an exponentially distributed capacity, provisions the network on a ledger
//! and then fires random payments between random pairs of users, tracking the cumulative success
//! ratio as trials accumulate.

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod ledger;
pub mod utils;
