// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Settings for a test suite run.

use std::path::PathBuf;

use crate::stats::CriticalValueSource;

/// Conventional KS sample size.
pub const KS_SAMPLE_SIZE: usize = 100;
pub const CONFIDENCE_LEVELS: [f64; 3] = [0.80, 0.90, 0.95];
pub const ALPHA_LEVELS: [f64; 3] = [0.10, 0.05, 0.01];

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Directory holding the generated sample files.
    pub data_dir: PathBuf,
    pub critical_values: CriticalValueSource,
    /// Number of leading samples used for the KS test.
    pub ks_sample_size: usize,
    pub confidence_levels: Vec<f64>,
    pub alpha_levels: Vec<f64>,
    /// Reports are appended here in addition to stdout.
    pub result_file: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            data_dir: PathBuf::from("."),
            critical_values: CriticalValueSource::default(),
            ks_sample_size: KS_SAMPLE_SIZE,
            confidence_levels: CONFIDENCE_LEVELS.to_vec(),
            alpha_levels: ALPHA_LEVELS.to_vec(),
            result_file: None,
        }
    }
}

impl SuiteConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_critical_values(mut self, source: CriticalValueSource) -> Self {
        self.critical_values = source;
        self
    }

    pub fn with_result_file(mut self, result_file: Option<PathBuf>) -> Self {
        self.result_file = result_file;
        self
    }
}
