//! Utilities for reading configuration and topology files and for writing results.

pub use jointsim_utils::*;
