// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Uniformity testing of pseudo random sequences in [0, 1).
//! Two generators are available, the rand crates `StdRng` and a small LCG.
//! Their output is persisted to text files and checked with a
//! Chi-Square and a Kolmogorov-Smirnov test.

pub mod command;
pub mod conditioning;
pub mod config;
pub mod errors;
pub mod rng_testing;
pub mod rngs;
pub mod sequence;
pub mod stats;
pub mod strings;
pub mod utils;

pub use errors::{TestError, TestResult};
pub use rng_testing::{generate_and_test, run_suite, run_suite_named, SuiteReport};

