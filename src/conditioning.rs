// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Methods to turn random bits into more constrained data types.

/// Maps a u64 to the 0..1 range in f64.
/// The destribution is uniform but only uses
/// the lower 52 bits of the u64.
/// Not all possible f64 in the output range are produced by this function.
pub fn u64_to_double(int: u64) -> f64 {
    let return_float = (int & 0x000fffffffffffff) | 0x3ff0000000000000;
    f64::from_bits(return_float) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.0)]
    #[case(u64::MAX, 1.0 - f64::EPSILON)]
    #[case(0x0008000000000000, 0.5)]
    fn u64_to_double_bounds(#[case] int: u64, #[case] expected: f64) {
        assert_eq!(u64_to_double(int), expected);
    }
}
