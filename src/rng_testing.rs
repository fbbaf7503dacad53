// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Statistical testing of a generator's persisted output.

use std::{fmt, time::Instant};

use tracing::{info, warn};

use crate::{
    config::SuiteConfig,
    errors::{TestError, TestResult},
    sequence::{self, GeneratorKind},
    stats::{self, BucketCounts, KsStatistic, Verdict},
    strings, utils,
};

/// One Chi-Square classification.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChiSquaredOutcome {
    pub confidence_level: f64,
    pub critical_value: f64,
    pub verdict: Verdict,
}

/// One KS classification.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KsOutcome {
    pub alpha_level: f64,
    pub critical_value: f64,
    pub verdict: Verdict,
}

/// Everything measured for one generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub generator: GeneratorKind,
    pub observations: usize,
    pub buckets: BucketCounts,
    pub chi_squared: f64,
    pub degrees_of_freedom: u32,
    pub p_value: f64,
    pub chi_squared_outcomes: Vec<ChiSquaredOutcome>,
    pub ks: KsStatistic,
    pub ks_outcomes: Vec<KsOutcome>,
}

impl SuiteReport {
    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nTEST SUITE FOR:  {}\n", self.generator));
        out.push_str(strings::HEAVY_RULE);
        out.push('\n');
        out.push_str(&format!("Observations: {}\n", self.observations));
        out.push_str(strings::CHI_SQUARED_HEADER);
        out.push('\n');
        for bucket in 1..=stats::NUM_BUCKETS {
            out.push_str(&format!(
                "{:>2} [{:.1}, {:.1}): {}\n",
                bucket,
                (bucket - 1) as f64 / stats::NUM_BUCKETS as f64,
                bucket as f64 / stats::NUM_BUCKETS as f64,
                self.buckets.get(bucket).unwrap_or(0)
            ));
        }
        out.push_str(&format!(
            "Chi Sq: {}     df: {}     p: {:.6}\n",
            self.chi_squared, self.degrees_of_freedom, self.p_value
        ));
        for outcome in &self.chi_squared_outcomes {
            out.push_str(&format!(
                "Significance Level: {}\nChi Sq: {}\nCrit Value: {}\nResult is: {}\n{}\n",
                outcome.confidence_level,
                self.chi_squared,
                outcome.critical_value,
                outcome.verdict,
                strings::LIGHT_RULE
            ));
        }
        out.push('\n');
        out.push_str(strings::KS_HEADER);
        out.push('\n');
        out.push_str(&format!(
            "D+ VALUE = {}\nD- VALUE = {}\nD VALUE (max): {}\nn: {}\n",
            self.ks.d_plus,
            self.ks.d_minus,
            self.ks.d(),
            self.ks.n
        ));
        for outcome in &self.ks_outcomes {
            out.push_str(&format!(
                "Alpha Level is: {}\nD_statistic is: {}\nCritical value is: {}\nResult is: {}\n{}\n",
                outcome.alpha_level,
                self.ks.d(),
                outcome.critical_value,
                outcome.verdict,
                strings::LIGHT_RULE
            ));
        }
        out.push_str(&format!(
            "Kolmogorov-Smirnov Test Result for D-Value: {}\n",
            self.ks.d()
        ));
        out
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Chi-Square over the full sequence at every configured confidence level.
fn chi_squared_stage(
    samples: &[f64],
    observations: usize,
    config: &SuiteConfig,
) -> TestResult<(BucketCounts, f64, Vec<ChiSquaredOutcome>)> {
    let buckets = BucketCounts::from_samples(samples)?;
    let chi_squared = stats::chi_squared_statistic(&buckets, observations)?;
    let mut outcomes = Vec::with_capacity(config.confidence_levels.len());
    for &confidence_level in &config.confidence_levels {
        let (critical_value, verdict) = stats::chi_squared_significance(
            chi_squared,
            confidence_level,
            config.critical_values,
            observations,
        )?;
        outcomes.push(ChiSquaredOutcome {
            confidence_level,
            critical_value,
            verdict,
        });
    }
    Ok((buckets, chi_squared, outcomes))
}

/// KS over the leading `ks_sample_size` samples at every configured alpha level.
fn ks_stage(
    generator: GeneratorKind,
    samples: &[f64],
    config: &SuiteConfig,
) -> TestResult<(KsStatistic, Vec<KsOutcome>)> {
    let n = samples.len().min(config.ks_sample_size);
    if n == 0 {
        return Err(TestError::malformed(
            generator.path_in(&config.data_dir),
            "no samples available for the KS test",
        ));
    }
    if n < config.ks_sample_size {
        warn!(
            available = samples.len(),
            wanted = config.ks_sample_size,
            "fewer samples than the KS sample size, testing all of them"
        );
    }
    let ks = stats::kolmogorov_smirnov_statistic(&samples[..n])?;
    let mut outcomes = Vec::with_capacity(config.alpha_levels.len());
    for &alpha_level in &config.alpha_levels {
        let (critical_value, verdict) = stats::ks_significance(ks.d(), ks.n, alpha_level)?;
        outcomes.push(KsOutcome {
            alpha_level,
            critical_value,
            verdict,
        });
    }
    Ok((ks, outcomes))
}

/// Run both tests on an in-memory sequence.
/// The observation count is the length of `samples`.
pub fn test_samples(
    generator: GeneratorKind,
    samples: &[f64],
    config: &SuiteConfig,
) -> TestResult<SuiteReport> {
    let observations = samples.len();
    let (buckets, chi_squared, chi_squared_outcomes) =
        chi_squared_stage(samples, observations, config)?;
    let degrees_of_freedom = config.critical_values.degrees_of_freedom(observations);
    let p_value = stats::chi_squared_p_value(degrees_of_freedom, chi_squared)?;
    let (ks, ks_outcomes) = ks_stage(generator, samples, config)?;
    Ok(SuiteReport {
        generator,
        observations,
        buckets,
        chi_squared,
        degrees_of_freedom,
        p_value,
        chi_squared_outcomes,
        ks,
        ks_outcomes,
    })
}

/// Read the persisted sequence of `generator` and test it.
/// Fails if the file does not hold exactly `observations` samples.
pub fn run_suite(
    generator: GeneratorKind,
    observations: usize,
    config: &SuiteConfig,
) -> TestResult<SuiteReport> {
    let start = Instant::now();
    let path = generator.path_in(&config.data_dir);
    let samples = sequence::read_sequence(&path)?;
    if samples.len() != observations {
        return Err(TestError::malformed(
            &path,
            format!(
                "expected {} samples, found {}",
                observations,
                samples.len()
            ),
        ));
    }
    let report = test_samples(generator, &samples, config)?;
    info!(
        generator = %generator,
        observations,
        elapsed = %utils::format_elapsed_time(start.elapsed()),
        "test suite finished"
    );
    Ok(report)
}

/// Resolve a selector and run the suite for it.
pub fn run_suite_named(
    selector: &str,
    observations: usize,
    config: &SuiteConfig,
) -> TestResult<SuiteReport> {
    run_suite(GeneratorKind::from_selector(selector)?, observations, config)
}

/// Generate `observations` samples, test them and publish the report.
pub fn generate_and_test(
    generator: GeneratorKind,
    observations: usize,
    config: &SuiteConfig,
) -> TestResult<SuiteReport> {
    let path = sequence::generate(generator, observations, &config.data_dir)?;
    println!(
        "Successfully stored {} random numbers in file named: {}",
        observations,
        path.display()
    );
    let report = run_suite(generator, observations, config)?;
    utils::write_and_print(&report.format(), config.result_file.as_deref())?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CriticalValueSource;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> SuiteConfig {
        SuiteConfig::default().with_data_dir(dir.path())
    }

    #[test]
    fn lcg_suite_covers_every_level() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        sequence::generate(GeneratorKind::Lcg, 10001, &config.data_dir).unwrap();
        let report = run_suite(GeneratorKind::Lcg, 10001, &config).unwrap();
        assert_eq!(report.buckets.total(), 10001);
        assert_eq!(report.chi_squared_outcomes.len(), 3);
        assert_eq!(report.ks_outcomes.len(), 3);
        assert_eq!(report.ks.n, 100);
        assert_eq!(report.degrees_of_freedom, 10000);
        let critical: Vec<f64> = report
            .chi_squared_outcomes
            .iter()
            .map(|o| o.critical_value)
            .collect();
        assert_eq!(critical, vec![10118.8246, 10181.6616, 10233.7489]);
        let levels: Vec<f64> = report
            .chi_squared_outcomes
            .iter()
            .map(|o| o.confidence_level)
            .collect();
        assert_eq!(levels, vec![0.80, 0.90, 0.95]);
    }

    #[test]
    fn ks_uses_leading_samples() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let path = sequence::generate(GeneratorKind::Lcg, 1000, &config.data_dir).unwrap();
        let prefix = sequence::read_prefix(&path, 100).unwrap();
        let expected = stats::kolmogorov_smirnov_statistic(&prefix).unwrap();
        let report = run_suite(GeneratorKind::Lcg, 1000, &config).unwrap();
        assert_eq!(report.ks, expected);
    }

    #[test]
    fn tabulated_critical_values_are_reported() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_critical_values(CriticalValueSource::Tabulated);
        sequence::generate(GeneratorKind::Platform, 10001, &config.data_dir).unwrap();
        let report = run_suite(GeneratorKind::Platform, 10001, &config).unwrap();
        let critical: Vec<f64> = report
            .chi_squared_outcomes
            .iter()
            .map(|o| o.critical_value)
            .collect();
        assert_eq!(critical, vec![10118.8246, 10181.6616, 10233.7489]);
        // 10 buckets never come close to a statistic of 10000.
        assert!(report
            .chi_squared_outcomes
            .iter()
            .all(|o| o.verdict == Verdict::FailToReject));
    }

    #[test]
    fn computed_critical_values_follow_observations() {
        let config = SuiteConfig::default().with_critical_values(CriticalValueSource::Computed);
        let samples: Vec<f64> = (0..500).map(|i| (i as f64 + 0.5) / 500.0).collect();
        let report = test_samples(GeneratorKind::Lcg, &samples, &config).unwrap();
        assert_eq!(report.degrees_of_freedom, 499);
        for outcome in &report.chi_squared_outcomes {
            let expected =
                stats::chi_squared_computed_critical_value(outcome.confidence_level, 499).unwrap();
            assert_eq!(outcome.critical_value, expected);
        }
    }

    #[test]
    fn constant_sequence_is_rejected() {
        let samples = vec![0.05; 200];
        let config = SuiteConfig::default().with_critical_values(CriticalValueSource::Computed);
        let report = test_samples(GeneratorKind::Lcg, &samples, &config).unwrap();
        assert_eq!(report.chi_squared, 1800.0);
        assert!(report
            .chi_squared_outcomes
            .iter()
            .all(|o| o.verdict == Verdict::Reject));
        assert!(report.ks_outcomes.iter().all(|o| o.verdict == Verdict::Reject));
    }

    #[test]
    fn short_sequence_tests_all_samples() {
        let samples: Vec<f64> = (0..40).map(|i| (i as f64 + 0.5) / 40.0).collect();
        let report = test_samples(GeneratorKind::Lcg, &samples, &SuiteConfig::default()).unwrap();
        assert_eq!(report.ks.n, 40);
    }

    #[test]
    fn zero_ks_sample_size_is_malformed() {
        let mut config = SuiteConfig::default();
        config.ks_sample_size = 0;
        let samples: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        assert!(matches!(
            test_samples(GeneratorKind::Lcg, &samples, &config),
            Err(TestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn unknown_selector_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_suite_named("7", 10, &config_in(&dir)),
            Err(TestError::UnknownGenerator(_))
        ));
    }

    #[test]
    fn missing_sequence_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_suite(GeneratorKind::Lcg, 10, &config_in(&dir)),
            Err(TestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn count_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        sequence::generate(GeneratorKind::Lcg, 50, &config.data_dir).unwrap();
        assert!(matches!(
            run_suite(GeneratorKind::Lcg, 60, &config),
            Err(TestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn invalid_level_aborts_suite() {
        let mut config = SuiteConfig::default();
        config.alpha_levels = vec![0.10, 0.2];
        let samples: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        assert!(matches!(
            test_samples(GeneratorKind::Lcg, &samples, &config),
            Err(TestError::InvalidAlphaLevel(_))
        ));
        config.alpha_levels = vec![0.10];
        config.confidence_levels = vec![0.5];
        assert!(matches!(
            test_samples(GeneratorKind::Lcg, &samples, &config),
            Err(TestError::InvalidConfidenceLevel(_))
        ));
    }

    #[test]
    fn report_mentions_every_section() {
        let dir = TempDir::new().unwrap();
        let result_file = dir.path().join("rslt.txt");
        let config = config_in(&dir).with_result_file(Some(result_file.clone()));
        let report = generate_and_test(GeneratorKind::Lcg, 500, &config).unwrap();
        let text = report.format();
        assert!(text.contains("LINEAR CONGRUENTIAL GENERATOR"));
        assert!(text.contains("D+ VALUE"));
        assert!(text.contains("Crit Value"));
        assert!(text.contains(&format!(" 1 [0.0, 0.1): {}", report.buckets.get(1).unwrap())));
        assert!(text.contains(&format!("10 [0.9, 1.0): {}", report.buckets.get(10).unwrap())));
        let logged = std::fs::read_to_string(result_file).unwrap();
        assert!(logged.contains("TEST SUITE FOR:  LINEAR CONGRUENTIAL GENERATOR"));
    }
}
