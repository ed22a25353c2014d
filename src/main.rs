// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Kanata log generator
//!
//! This program converts a probe capture into a Kanata log. The capture and
//! the log are supplied as positional parameters. Optionally, parameters may
//! be supplied in the form of a TOML file, e.g.
//!
//! ```toml
//! malformed_token = "report"
//! orphan_completion = "abort"
//! ```
//!
//! Recoverable conditions are logged as warnings. With `--strict`, the program
//! exits with status 3 if any such condition was encountered.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Level, Verbosity};

use probe_kanata::config::Parameters;
use probe_kanata::pipeline;

/// Exit status signaling recoverable conditions in strict mode
const EXIT_DIAGNOSTICS: u8 = 3;

/// Convert a probe capture into a Kanata log
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the hex capture
    input: PathBuf,

    /// Path of the Kanata log to write
    output: PathBuf,

    /// Decoding parameters
    #[arg(short, long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Exit with a non-zero status if any recoverable condition is encountered
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = match args.verbose.log_level() {
        Some(Level::Error) => tracing::Level::ERROR,
        Some(Level::Warn) => tracing::Level::WARN,
        Some(Level::Info) => tracing::Level::INFO,
        Some(Level::Debug) => tracing::Level::DEBUG,
        Some(Level::Trace) => tracing::Level::TRACE,
        None => tracing::Level::ERROR,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let params: Parameters = args
        .params
        .as_ref()
        .map(|p| {
            let params = fs::read_to_string(p)
                .with_context(|| format!("could not read parameters `{}`", p.display()))?;
            toml::from_str::<Parameters>(&params)
                .with_context(|| format!("could not parse parameters `{}`", p.display()))
        })
        .transpose()?
        .unwrap_or_default();
    tracing::debug!(?params, "Using parameters");

    let capture = fs::read_to_string(&args.input)
        .with_context(|| format!("could not read capture `{}`", args.input.display()))?;

    let output = fs::File::create(&args.output)
        .with_context(|| format!("could not create log `{}`", args.output.display()))?;
    let mut output = BufWriter::new(output);

    let res = pipeline::run(capture.lines(), &mut output, &params);
    // Keep whatever was converted before an error
    output
        .flush()
        .with_context(|| format!("could not write log `{}`", args.output.display()))?;
    let report = res.with_context(|| format!("could not convert `{}`", args.input.display()))?;

    tracing::info!(
        tokens = report.tokens,
        events = report.events,
        cycles = report.cycles,
        "Wrote {}",
        args.output.display()
    );

    if args.strict && !report.is_clean() {
        tracing::error!(
            "{} recoverable conditions encountered",
            report.diagnostics.len()
        );
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }
    Ok(ExitCode::SUCCESS)
}
