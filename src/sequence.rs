// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Persisted sample sequences.
//! Each generator writes its samples to a fixed file, one float per line.
//! Every generation run overwrites the previous file.

use std::{
    fmt,
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    errors::{TestError, TestResult},
    rngs::{self, RNG},
    stats,
};

/// Sample sources that can be generated and tested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GeneratorKind {
    /// The rand crate's `StdRng`.
    Platform,
    /// The linear congruential generator in `rngs::lcg`.
    Lcg,
}

impl GeneratorKind {
    /// Resolve a menu selector ("1" or "2").
    pub fn from_selector(selector: &str) -> TestResult<Self> {
        match selector.trim() {
            "1" => Ok(GeneratorKind::Platform),
            "2" => Ok(GeneratorKind::Lcg),
            other => Err(TestError::UnknownGenerator(other.to_owned())),
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            GeneratorKind::Platform => "platform_output.txt",
            GeneratorKind::Lcg => "lcg_output.txt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GeneratorKind::Platform => "PLATFORM BUILT-IN RAND",
            GeneratorKind::Lcg => "LINEAR CONGRUENTIAL GENERATOR",
        }
    }

    /// Location of this generator's sample file inside `data_dir`.
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Write `sample_size` samples from `test_rng` to `file_path`, one per line.
/// Samples go to a sibling temporary file first, which replaces `file_path`
/// only once every sample was written.
pub fn fill_sample_file(
    file_path: &Path,
    test_rng: &mut impl RNG,
    sample_size: usize,
) -> TestResult<()> {
    let mut tmp_path = file_path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);
    let result = (|| -> TestResult<()> {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        for _ in 0..sample_size {
            writeln!(writer, "{}", test_rng.next_f64())?;
        }
        writer.flush()?;
        Ok(())
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, file_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Generate `count` samples with a freshly seeded generator of `kind`
/// and store them in `data_dir`. Returns the path written.
pub fn generate(kind: GeneratorKind, count: usize, data_dir: &Path) -> TestResult<PathBuf> {
    let path = kind.path_in(data_dir);
    match kind {
        GeneratorKind::Platform => {
            let mut r = rngs::ReferenceRand::new(rngs::DEFAULT_SEED);
            fill_sample_file(&path, &mut r, count)?;
        }
        GeneratorKind::Lcg => {
            let mut r = rngs::lcg::Lcg::new(rngs::DEFAULT_SEED);
            fill_sample_file(&path, &mut r, count)?;
        }
    }
    info!(generator = %kind, count, path = %path.display(), "stored samples");
    Ok(path)
}

fn open_sequence(path: &Path) -> TestResult<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(TestError::malformed(path, "sample file does not exist"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse one line of a sample file. `line` is 1-based.
fn parse_sample(path: &Path, line: usize, text: &str) -> TestResult<f64> {
    let value: f64 = text.trim().parse().map_err(|_| {
        TestError::malformed(path, format!("line {line} is not a number: {text:?}"))
    })?;
    stats::validate_sample(value, line)
}

/// Read at most `limit` samples from the start of `path`.
/// A missing or empty file is malformed input.
pub fn read_prefix(path: &Path, limit: usize) -> TestResult<Vec<f64>> {
    let reader = open_sequence(path)?;
    let mut samples = Vec::new();
    for (i, line) in reader.lines().take(limit).enumerate() {
        samples.push(parse_sample(path, i + 1, &line?)?);
    }
    if samples.is_empty() {
        return Err(TestError::malformed(path, "sample file is empty"));
    }
    debug!(path = %path.display(), count = samples.len(), "read samples");
    Ok(samples)
}

/// Read every sample in `path`.
pub fn read_sequence(path: &Path) -> TestResult<Vec<f64>> {
    read_prefix(path, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write_lines(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[rstest]
    #[case("1", GeneratorKind::Platform)]
    #[case(" 2 ", GeneratorKind::Lcg)]
    fn selector_resolves(#[case] selector: &str, #[case] expected: GeneratorKind) {
        assert_eq!(GeneratorKind::from_selector(selector).unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("3")]
    #[case("lcg")]
    #[case("")]
    fn unknown_selector(#[case] selector: &str) {
        assert!(matches!(
            GeneratorKind::from_selector(selector),
            Err(TestError::UnknownGenerator(_))
        ));
    }

    #[test]
    fn failed_generation_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = generate(GeneratorKind::Lcg, 120, dir.path()).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        // A directory in place of the temporary file makes the write fail.
        fs::create_dir(dir.path().join("lcg_output.txt.tmp")).unwrap();
        assert!(generate(GeneratorKind::Lcg, 40, dir.path()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(read_sequence(&path).unwrap().len(), 120);
    }

    #[test]
    fn failed_rename_removes_temporary_file() {
        let dir = TempDir::new().unwrap();
        // Renaming a file over a non-empty directory fails.
        let target = dir.path().join("lcg_output.txt");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        assert!(generate(GeneratorKind::Lcg, 10, dir.path()).is_err());
        assert!(!dir.path().join("lcg_output.txt.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn lcg_file_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let path = generate(GeneratorKind::Lcg, 500, dir.path()).unwrap();
        let first = read_sequence(&path).unwrap();
        generate(GeneratorKind::Lcg, 500, dir.path()).unwrap();
        let second = read_sequence(&path).unwrap();
        assert_eq!(first.len(), 500);
        assert_eq!(first, second);
        assert_eq!(&first[..3], &[0.345458984375, 0.8733062744140625, 0.84039306640625]);
    }

    #[test]
    fn platform_file_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let path = generate(GeneratorKind::Platform, 200, dir.path()).unwrap();
        let first = read_sequence(&path).unwrap();
        generate(GeneratorKind::Platform, 200, dir.path()).unwrap();
        assert_eq!(first, read_sequence(&path).unwrap());
    }

    #[test]
    fn generation_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = generate(GeneratorKind::Lcg, 300, dir.path()).unwrap();
        generate(GeneratorKind::Lcg, 20, dir.path()).unwrap();
        assert_eq!(read_sequence(&path).unwrap().len(), 20);
        assert!(!dir.path().join("lcg_output.txt.tmp").exists());
    }

    #[test]
    fn read_prefix_limits() {
        let dir = TempDir::new().unwrap();
        let path = generate(GeneratorKind::Lcg, 250, dir.path()).unwrap();
        let all = read_sequence(&path).unwrap();
        let prefix = read_prefix(&path, 100).unwrap();
        assert_eq!(prefix.as_slice(), &all[..100]);
    }

    #[test]
    fn missing_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_sequence(&dir.path().join("nope.txt")),
            Err(TestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn empty_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "empty.txt", "");
        assert!(matches!(
            read_sequence(&path),
            Err(TestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn non_numeric_line_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "bad.txt", "0.1\n0.2\nabc\n");
        match read_sequence(&path) {
            Err(TestError::MalformedInput { reason, .. }) => assert!(reason.contains("line 3")),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_line_is_invalid_sample() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "range.txt", "0.1\n1.0\n");
        assert!(matches!(
            read_sequence(&path),
            Err(TestError::InvalidSample { line: 2, value }) if value == 1.0
        ));
    }
}
