// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Misc utility functions.

use std::{
    fs::OpenOptions,
    io::Write,
    path::Path,
    time::Duration,
};

use crate::errors::TestResult;

/// Print `text` and, if a result file is given, append it there
/// under a local timestamp.
pub fn write_and_print(text: &str, result_file: Option<&Path>) -> TestResult<()> {
    println!("{}", text);
    if let Some(path) = result_file {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(
            file,
            "# {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "{}", text)?;
    }
    Ok(())
}

/// Format a duration with a unit fitting its magnitude.
/// e.g. 1500ms is 1.500 s
pub fn format_elapsed_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 1.0 {
        format!("{:.3} s", secs)
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else {
        format!("{:.3} µs", secs * 1e6)
    }
}
