// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use randcheck::{
    command::{parse_observation_count, Command},
    config::{SuiteConfig, KS_SAMPLE_SIZE},
    generate_and_test,
    sequence::GeneratorKind,
    stats::CriticalValueSource,
    strings,
    TestResult,
};
use tracing::{error, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum CriticalValues {
    /// Fixed table for 10000 degrees of freedom.
    Tabulated,
    /// Chi-Square inverse CDF for N - 1 degrees of freedom.
    Computed,
}

impl From<CriticalValues> for CriticalValueSource {
    fn from(value: CriticalValues) -> Self {
        match value {
            CriticalValues::Tabulated => CriticalValueSource::Tabulated,
            CriticalValues::Computed => CriticalValueSource::Computed,
        }
    }
}

/// Generate pseudo random sequences and test them for uniformity.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the sample files.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = CriticalValues::Tabulated)]
    critical_values: CriticalValues,
    #[arg(long, default_value_t = KS_SAMPLE_SIZE)]
    ks_sample_size: usize,
    /// Also append every report to this file.
    #[arg(long)]
    result_file: Option<PathBuf>,
    /// Generator selector (1 or 2). Runs once instead of interactively.
    #[arg(short, long, requires = "count")]
    generator: Option<String>,
    /// Number of observations for a non-interactive run.
    #[arg(short, long, requires = "generator")]
    count: Option<String>,
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>) -> TestResult<Option<String>> {
    print!("{}", strings::PROMPT);
    io::stdout().flush()?;
    lines.next().transpose().map_err(Into::into)
}

fn interactive(config: &SuiteConfig) -> TestResult<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", strings::MENU);
        let Some(input) = prompt(&mut lines)? else {
            return Ok(());
        };
        let generator = match Command::parse(&input) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Generate(generator)) => generator,
            Err(e) => {
                println!("{}\n{}", e, strings::SELECTOR_HELP);
                continue;
            }
        };
        println!("{}", strings::COUNT_PROMPT);
        let Some(input) = prompt(&mut lines)? else {
            return Ok(());
        };
        let result = parse_observation_count(&input)
            .and_then(|count| generate_and_test(generator, count, config));
        if let Err(e) = result {
            error!("{}", e);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = SuiteConfig::default()
        .with_data_dir(args.data_dir)
        .with_critical_values(args.critical_values.into())
        .with_result_file(args.result_file);
    config.ks_sample_size = args.ks_sample_size;

    match (args.generator, args.count) {
        (Some(generator), Some(count)) => {
            let generator = GeneratorKind::from_selector(&generator)?;
            let count = parse_observation_count(&count)?;
            generate_and_test(generator, count, &config)?;
        }
        _ => interactive(&config)?,
    }
    Ok(())
}
