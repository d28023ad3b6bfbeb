// Copyright (c) 2026 objsize Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use objsize::demangle::demangle_listing;
use objsize::report;
use objsize::results::{ReductionConfig, ReductionReport, ResultTable};
use objsize::stats::CounterTally;
use objsize::text_size::section_totals_of;
use objsize::ListingSource;

/// Code-size numbers from disassembly listings and object files.
#[derive(Parser, Debug)]
#[command(name = "objsize", version)]
struct Cli {
    /// Enable debug output
    #[arg(short = 'd', long = "debug", global = true, default_value_t = false)]
    debug: bool,

    /// Explicit log spec, e.g. "info" or "objsize::extract=trace"
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-function sizes from an objdump listing
    Extract(ExtractArgs),
    /// Raw byte count of objdump listings
    Bytes(BytesArgs),
    /// Text/data/bss sizes of object files
    TextSize(TextSizeArgs),
    /// Tally pass statistics counters
    Stats(StatsArgs),
    /// Reduction of each variant against the baseline
    Reduction(ReductionArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Tag written in the second column, usually the build variant
    label: String,

    /// objdump -d output
    listing: PathBuf,

    /// Demangle Rust and C++ function names
    #[arg(long, default_value_t = false)]
    demangle: bool,

    /// Only report these functions (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Include each function's instructions (json only)
    #[arg(long, default_value_t = false)]
    instructions: bool,
}

#[derive(Args, Debug)]
struct BytesArgs {
    #[arg(required = true)]
    listings: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct TextSizeArgs {
    /// Benchmark name written in the first column
    bench: String,

    #[arg(required = true)]
    objects: Vec<PathBuf>,

    /// Also print data and bss
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    files: Vec<PathBuf>,

    /// Counter names to report instead of the pass's default set
    #[arg(long = "key", value_name = "KEY")]
    keys: Vec<String>,
}

#[derive(Args, Debug)]
struct ReductionArgs {
    /// `benchmark, variant, value` rows
    results: PathBuf,

    /// Variants to compare, comma separated
    #[arg(long, value_delimiter = ',', default_value = "LLVM,RoLAG")]
    groups: Vec<String>,

    /// Add a leading column with the best of the groups under this name
    #[arg(long, value_name = "NAME")]
    oracle: Option<String>,

    /// Columns ordering the rows, most significant first (default: last group)
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    sort_by: Vec<String>,

    #[arg(long, default_value = "baseline")]
    baseline: String,

    /// Benchmarks to leave out (repeatable)
    #[arg(long = "ignore", value_name = "BENCH")]
    ignore: Vec<String>,

    /// Keep benchmarks no variant changed
    #[arg(long, default_value_t = false)]
    keep_unchanged: bool,

    #[arg(long, default_value_t = 2)]
    decimals: usize,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let spec = match (&cli.log_level, cli.debug) {
        (Some(spec), _) => spec.clone(),
        (None, true) => "debug".to_string(),
        (None, false) => "warn".to_string(),
    };
    // Logs go to stderr; stdout carries the report
    let _logger = Logger::try_with_env_or_str(&spec)?
        .log_to_stderr()
        .start()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let now = Instant::now();
    match cli.command {
        Command::Extract(args) => run_extract(args, &mut out)?,
        Command::Bytes(args) => run_bytes(args, &mut out)?,
        Command::TextSize(args) => run_text_size(args, &mut out)?,
        Command::Stats(args) => run_stats(args, &mut out)?,
        Command::Reduction(args) => run_reduction(args, &mut out)?,
    }
    out.flush()?;
    info!("done in {:.2?}", now.elapsed());
    Ok(())
}

fn run_extract<W: Write>(args: ExtractArgs, out: &mut W) -> Result<()> {
    let mut listing = ListingSource::path(&args.listing).extract()?;
    if args.demangle {
        demangle_listing(&mut listing);
    }
    if !args.only.is_empty() {
        listing.retain_names(&args.only);
    }
    info!(
        "{}: {} functions, {} bytes",
        args.listing.display(),
        listing.len(),
        listing.total_size()
    );
    match args.format {
        Format::Csv => report::write_csv(out, &listing, &args.label)?,
        Format::Json => {
            let v = report::to_json(&listing, args.instructions)?;
            serde_json::to_writer_pretty(&mut *out, &v)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_bytes<W: Write>(args: BytesArgs, out: &mut W) -> Result<()> {
    for path in &args.listings {
        let count = ListingSource::path(path).binary_size()?;
        writeln!(out, "{}, {}", path.display(), count)?;
    }
    Ok(())
}

fn run_text_size<W: Write>(args: TextSizeArgs, out: &mut W) -> Result<()> {
    for path in &args.objects {
        let totals = section_totals_of(path)?;
        let object = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if args.all {
            writeln!(
                out,
                "{}, {}, {}, {}, {}",
                args.bench, object, totals.text, totals.data, totals.bss
            )?;
        } else {
            writeln!(out, "{}, {}, {}", args.bench, object, totals.text)?;
        }
    }
    Ok(())
}

fn run_stats<W: Write>(args: StatsArgs, out: &mut W) -> Result<()> {
    let mut tally = if args.keys.is_empty() {
        CounterTally::default()
    } else {
        CounterTally::new(&args.keys)
    };
    if args.files.is_empty() {
        let text = io::read_to_string(io::stdin()).context("reading stdin")?;
        tally.add_text(&text);
    }
    for path in &args.files {
        tally.add_file(path)?;
    }
    tally.write_report(out)
}

fn run_reduction<W: Write>(args: ReductionArgs, out: &mut W) -> Result<()> {
    let table = ResultTable::from_file(&args.results)?;
    let config = ReductionConfig {
        baseline: args.baseline,
        groups: args.groups,
        oracle: args.oracle,
        sort_by: args.sort_by,
        ignore: args.ignore,
        keep_unchanged: args.keep_unchanged,
    };
    let report = ReductionReport::build(&table, &config)?;
    match args.format {
        Format::Csv => report.write_csv(out, args.decimals)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
