// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Sample generators under test.
//! Both implement the RNG interface and produce floats in [0, 1)
//! through `next_f64`.

use rand::{RngCore, SeedableRng};

use crate::conditioning;

/// Seed shared by every generator so repeated runs reproduce the same sequence.
pub const DEFAULT_SEED: u64 = 123456789;

/// General trait for PRNGs
pub trait RNG {
    /// Initialize with specified seed.
    fn new(seed: u64) -> Self;
    /// Generate u64 and advance the state one step.
    fn next(&mut self) -> u64;
    /// Generate a float in [0, 1) and advance the state one step.
    fn next_f64(&mut self) -> f64 {
        conditioning::u64_to_double(self.next())
    }
}

/// The platform generator, backed by the rand crate's `StdRng`.
/// Every instance owns its state, nothing is shared between runs.
pub struct ReferenceRand {
    rng: rand::rngs::StdRng,
}

impl RNG for ReferenceRand {
    fn new(seed: u64) -> Self {
        ReferenceRand {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    fn next(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

// Linear congruential generators
pub mod lcg {
    use super::RNG;

    pub const MULTIPLIER: u64 = 101427;
    pub const INCREMENT: u64 = 321;
    pub const MODULUS: u64 = 1 << 16;

    /// X_(i+1) = (a * X_i + c) mod m with a = 101427, c = 321, m = 2**16.
    /// The seed is only reduced by the first step, so seeds above the
    /// modulus are accepted as is.
    /// Output space is 0..2**16, `next_f64` returns X_(i+1) / m.
    #[derive(Debug, Copy, Clone)]
    pub struct Lcg {
        state: u64,
    }

    impl RNG for Lcg {
        fn new(seed: u64) -> Self {
            Lcg { state: seed }
        }

        fn next(&mut self) -> u64 {
            // a * state fits in u64 for any state below 2**47.
            self.state = (self.state % (1 << 47))
                .wrapping_mul(MULTIPLIER)
                .wrapping_add(INCREMENT)
                % MODULUS;
            self.state
        }

        fn next_f64(&mut self) -> f64 {
            self.next() as f64 / MODULUS as f64
        }
    }
}
