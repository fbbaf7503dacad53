// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Uniformity tests for sequences of floats in [0, 1).
//!
//! Chi-Square: samples are counted into ten equal width buckets and compared
//! against an equal expected count per bucket.
//! Kolmogorov-Smirnov: the empirical CDF of a sorted subset is compared
//! against the uniform CDF through the D+ and D- statistics.
//!
//! Both statistics are classified against critical values. A statistic
//! equal to its critical value does not reject the null hypothesis.

use std::fmt;

use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

use crate::errors::{TestError, TestResult};

pub const NUM_BUCKETS: usize = 10;

/// Degrees of freedom the tabulated Chi-Square critical values were computed for.
pub const TABULATED_DEGREES_OF_FREEDOM: u32 = 10000;

/// (confidence level, critical value) at 10000 degrees of freedom.
pub const CHI_SQUARED_TABLE: [(f64, f64); 3] =
    [(0.80, 10118.8246), (0.90, 10181.6616), (0.95, 10233.7489)];

/// (alpha level, k) for the KS critical value k / sqrt(n).
/// Banks & Carson, Discrete-Event System Simulation, table A.7.
pub const KS_TABLE: [(f64, f64); 3] = [(0.10, 1.22), (0.05, 1.36), (0.01, 1.63)];

const LEVEL_TOLERANCE: f64 = 1e-9;

fn lookup_level(table: &[(f64, f64)], level: f64) -> Option<f64> {
    table
        .iter()
        .find(|(l, _)| (l - level).abs() < LEVEL_TOLERANCE)
        .map(|&(_, v)| v)
}

/// Outcome of comparing a statistic to its critical value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    FailToReject,
    Reject,
}

impl Verdict {
    /// Reject only if the statistic strictly exceeds the critical value.
    pub fn from_comparison(statistic: f64, critical_value: f64) -> Self {
        if statistic > critical_value {
            Verdict::Reject
        } else {
            Verdict::FailToReject
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::FailToReject => f.write_str("FAIL TO REJECT null hypothesis"),
            Verdict::Reject => f.write_str("REJECT null hypothesis"),
        }
    }
}

/// Check that a sample lies in [0, 1).
/// `line` is the 1-based position used in the error.
pub fn validate_sample(value: f64, line: usize) -> TestResult<f64> {
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TestError::InvalidSample { line, value })
    }
}

/// Bucket index (0-based) of a sample already known to be in [0, 1).
/// Bucket i covers [0.1 * i, 0.1 * (i + 1)), the last bucket ends at 1.0.
/// The bucket edges are the f64 nearest to i / 10, so a sample counts in
/// the same bucket as a strict `x < 0.1, x < 0.2, ...` chain would put it.
fn bucket_index(value: f64) -> usize {
    let mut index = ((value * NUM_BUCKETS as f64).floor() as usize).min(NUM_BUCKETS - 1);
    // x * 10 may round across an edge in either direction.
    if index > 0 && value < index as f64 / NUM_BUCKETS as f64 {
        index -= 1;
    } else if index < NUM_BUCKETS - 1 && value >= (index + 1) as f64 / NUM_BUCKETS as f64 {
        index += 1;
    }
    index
}

/// Number of samples in each tenth of [0, 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCounts {
    counts: [usize; NUM_BUCKETS],
}

impl BucketCounts {
    /// Count every sample into its bucket.
    /// Fails on the first sample outside [0, 1).
    pub fn from_samples(samples: &[f64]) -> TestResult<Self> {
        let mut counts = [0usize; NUM_BUCKETS];
        for (i, &sample) in samples.iter().enumerate() {
            let sample = validate_sample(sample, i + 1)?;
            counts[bucket_index(sample)] += 1;
        }
        Ok(BucketCounts { counts })
    }

    pub fn counts(&self) -> &[usize; NUM_BUCKETS] {
        &self.counts
    }

    /// Count of the 1-based bucket, `bucket` in 1..=10.
    pub fn get(&self, bucket: usize) -> Option<usize> {
        bucket
            .checked_sub(1)
            .and_then(|i| self.counts.get(i))
            .copied()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Chi-Square statistic for `num_samples` samples spread over ten buckets,
/// each expected to hold num_samples / 10.
/// sum((expected - observed)^2 / expected)
pub fn chi_squared_statistic(counts: &BucketCounts, num_samples: usize) -> TestResult<f64> {
    if num_samples == 0 {
        return Err(TestError::Distribution(
            "Chi-Square statistic needs at least one sample".to_owned(),
        ));
    }
    let expected: f64 = num_samples as f64 / NUM_BUCKETS as f64;
    let mut chi_squared: f64 = 0.0;
    for &observed in counts.counts() {
        chi_squared += (expected - observed as f64).powi(2) / expected;
    }
    debug!(chi_squared, num_samples, "computed Chi-Square statistic");
    Ok(chi_squared)
}

/// Where Chi-Square critical values come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CriticalValueSource {
    /// Fixed values for 10000 degrees of freedom.
    /// Only meaningful for roughly 10001 samples.
    #[default]
    Tabulated,
    /// Inverse CDF of the Chi-Square distribution for N - 1 degrees of freedom.
    Computed,
}

impl CriticalValueSource {
    pub fn degrees_of_freedom(&self, num_samples: usize) -> u32 {
        match self {
            CriticalValueSource::Tabulated => TABULATED_DEGREES_OF_FREEDOM,
            CriticalValueSource::Computed => num_samples.saturating_sub(1) as u32,
        }
    }
}

/// Whether the tabulated critical values fit a test over `num_samples`
/// samples, within 1% of 10001.
pub fn tabulated_values_apply(num_samples: usize) -> bool {
    let expected_samples = TABULATED_DEGREES_OF_FREEDOM as usize + 1;
    num_samples.abs_diff(expected_samples) <= expected_samples / 100
}

/// Tabulated critical value for 10000 degrees of freedom.
pub fn chi_squared_tabulated_critical_value(confidence_level: f64) -> TestResult<f64> {
    lookup_level(&CHI_SQUARED_TABLE, confidence_level)
        .ok_or(TestError::InvalidConfidenceLevel(confidence_level))
}

fn chi_squared_distribution(df: u32) -> TestResult<ChiSquared> {
    ChiSquared::new(df as f64).map_err(|e| TestError::Distribution(e.to_string()))
}

/// Critical value from the Chi-Square inverse CDF.
/// Only the three tabulated confidence levels are accepted.
pub fn chi_squared_computed_critical_value(confidence_level: f64, df: u32) -> TestResult<f64> {
    if lookup_level(&CHI_SQUARED_TABLE, confidence_level).is_none() {
        return Err(TestError::InvalidConfidenceLevel(confidence_level));
    }
    Ok(chi_squared_distribution(df)?.inverse_cdf(confidence_level))
}

/// Critical value at `confidence_level` for a test over `num_samples` samples.
pub fn chi_squared_critical_value(
    source: CriticalValueSource,
    confidence_level: f64,
    num_samples: usize,
) -> TestResult<f64> {
    match source {
        CriticalValueSource::Tabulated => {
            let critical_value = chi_squared_tabulated_critical_value(confidence_level)?;
            if !tabulated_values_apply(num_samples) {
                warn!(
                    num_samples,
                    expected_samples = TABULATED_DEGREES_OF_FREEDOM + 1,
                    "tabulated Chi-Square critical values assume 10000 degrees of freedom, comparison is not statistically valid"
                );
            }
            Ok(critical_value)
        }
        CriticalValueSource::Computed => chi_squared_computed_critical_value(
            confidence_level,
            source.degrees_of_freedom(num_samples),
        ),
    }
}

/// Upper tail probability for given degrees of freedom and chi squared value.
pub fn chi_squared_p_value(df: u32, chi_squared: f64) -> TestResult<f64> {
    Ok(1.0 - chi_squared_distribution(df)?.cdf(chi_squared))
}

/// Classify a Chi-Square statistic at one confidence level.
pub fn chi_squared_significance(
    chi_squared: f64,
    confidence_level: f64,
    source: CriticalValueSource,
    num_samples: usize,
) -> TestResult<(f64, Verdict)> {
    let critical_value = chi_squared_critical_value(source, confidence_level, num_samples)?;
    Ok((
        critical_value,
        Verdict::from_comparison(chi_squared, critical_value),
    ))
}

/// D+, D- and D = max(D+, D-) of a Kolmogorov-Smirnov test against U(0, 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KsStatistic {
    pub d_plus: f64,
    pub d_minus: f64,
    pub n: usize,
}

impl KsStatistic {
    pub fn d(&self) -> f64 {
        self.d_plus.max(self.d_minus)
    }
}

/// max(i/n - x_i) over an ascending sample, never below zero.
pub fn ks_d_plus(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .fold(0.0, |max, (i, &x)| f64::max(max, (i + 1) as f64 / n - x))
}

/// max(x_i - (i-1)/n) over an ascending sample, never below zero.
pub fn ks_d_minus(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .fold(0.0, |max, (i, &x)| f64::max(max, x - i as f64 / n))
}

/// Sort a copy of `samples` and compute the KS statistics.
pub fn kolmogorov_smirnov_statistic(samples: &[f64]) -> TestResult<KsStatistic> {
    if samples.is_empty() {
        return Err(TestError::Distribution(
            "KS statistic needs at least one sample".to_owned(),
        ));
    }
    let mut sorted = Vec::with_capacity(samples.len());
    for (i, &sample) in samples.iter().enumerate() {
        sorted.push(validate_sample(sample, i + 1)?);
    }
    sorted.sort_by(f64::total_cmp);
    let statistic = KsStatistic {
        d_plus: ks_d_plus(&sorted),
        d_minus: ks_d_minus(&sorted),
        n: sorted.len(),
    };
    debug!(
        d_plus = statistic.d_plus,
        d_minus = statistic.d_minus,
        n = statistic.n,
        "computed KS statistic"
    );
    Ok(statistic)
}

/// k / sqrt(n), with k looked up from the alpha level.
pub fn ks_critical_value(n: usize, alpha_level: f64) -> TestResult<f64> {
    let k = lookup_level(&KS_TABLE, alpha_level).ok_or(TestError::InvalidAlphaLevel(alpha_level))?;
    if n == 0 {
        return Err(TestError::Distribution(
            "KS critical value needs at least one sample".to_owned(),
        ));
    }
    Ok(k / f64::sqrt(n as f64))
}

/// Classify a D statistic at one alpha level.
pub fn ks_significance(d: f64, n: usize, alpha_level: f64) -> TestResult<(f64, Verdict)> {
    let critical_value = ks_critical_value(n, alpha_level)?;
    Ok((critical_value, Verdict::from_comparison(d, critical_value)))
}
