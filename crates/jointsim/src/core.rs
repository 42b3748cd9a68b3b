//! Core jointsim data structures, traits, and routines. The most common entry point is
//! [run::run()], which turns a [specification](Spec) into a provisioned network and a
//! [series of success ratios](SuccessSample).

pub use jointsim_core::*;
