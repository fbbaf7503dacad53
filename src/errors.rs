// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Errors raised while generating or testing sample sequences.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestError {
    #[error("sample {value} on line {line} is outside [0, 1)")]
    InvalidSample { line: usize, value: f64 },
    #[error("invalid confidence level for Chi-Square test: {0} (must be 0.80, 0.90 or 0.95)")]
    InvalidConfidenceLevel(f64),
    #[error("invalid alpha level for KS test: {0} (must be 0.10, 0.05 or 0.01)")]
    InvalidAlphaLevel(f64),
    #[error("unknown generator: {0:?}")]
    UnknownGenerator(String),
    #[error("malformed input in {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },
    #[error("unrecognized command: {0:?}")]
    InvalidCommand(String),
    #[error("invalid observation count: {0:?} (must be a positive integer)")]
    InvalidObservationCount(String),
    #[error("distribution error: {0}")]
    Distribution(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TestError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TestError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type TestResult<T> = Result<T, TestError>;
