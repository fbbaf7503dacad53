// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Commands accepted by the interactive loop.

use crate::{
    errors::{TestError, TestResult},
    sequence::GeneratorKind,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(GeneratorKind),
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> TestResult<Self> {
        match input.trim() {
            "q" | "Q" | "quit" => Ok(Command::Quit),
            other => GeneratorKind::from_selector(other)
                .map(Command::Generate)
                .map_err(|_| TestError::InvalidCommand(other.to_owned())),
        }
    }
}

/// Parse a positive observation count.
pub fn parse_observation_count(input: &str) -> TestResult<usize> {
    match input.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(TestError::InvalidObservationCount(input.trim().to_owned())),
    }
}
