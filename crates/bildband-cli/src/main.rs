// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildband — turn a folder of images into a titled, one-image-per-page PDF.
//
// Entry point. Initialises logging, parses the command line into a
// conversion request, runs the pipeline behind a spinner, and prints the
// end-of-run summary.

mod progress;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bildband_core::error::BildbandError;
use bildband_core::human_errors::humanize_error;
use bildband_core::{AppConfig, ConversionOutcome, OrientationPolicy, PaperSize};
use bildband_document::{ConversionPipeline, ConversionRequest};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use progress::SpinnerProgress;

/// Turn a folder of images into a PDF, one image per page.
#[derive(Debug, Parser)]
#[command(name = "bildband", version, about)]
struct Cli {
    /// Folder containing the images.
    #[arg(short, long, value_name = "DIR")]
    source: PathBuf,

    /// Folder the PDF is written to.
    #[arg(short, long, value_name = "DIR")]
    dest: PathBuf,

    /// Document title; printed on the first page and used as the file name.
    #[arg(short, long)]
    title: String,

    /// Page orientation. Defaults to the config file's setting, else automatic.
    #[arg(short, long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Paper size. Defaults to the config file's setting, else A4.
    #[arg(short, long, value_enum)]
    paper: Option<PaperArg>,

    /// JSON settings file (paper size, orientation, layout).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationArg {
    /// Portrait pages.
    #[value(alias = "portrait")]
    Vertical,
    /// Landscape pages.
    #[value(alias = "landscape")]
    Horizontal,
    /// Landscape for wide images, portrait otherwise.
    #[value(alias = "auto")]
    Automatic,
}

impl From<OrientationArg> for OrientationPolicy {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Vertical => Self::Vertical,
            OrientationArg::Horizontal => Self::Horizontal,
            OrientationArg::Automatic => Self::Automatic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Bildband starting");

    match run(&cli) {
        Ok(outcome) => {
            print!("{}", outcome.summary());
            if outcome.output_path.is_some() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

/// Resolve settings, then convert.
fn run(cli: &Cli) -> Result<ConversionOutcome> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(paper) = cli.paper {
        config.paper_size = paper.into();
    }
    let policy = cli.orientation.map(OrientationPolicy::from).unwrap_or(config.orientation);

    let request = ConversionRequest::new(&cli.source, &cli.dest, cli.title.clone(), policy);
    let pipeline = ConversionPipeline::new(&config)?.with_progress(Arc::new(SpinnerProgress::new()));

    Ok(pipeline.run(&request)?)
}

/// Print a fatal error as a plain-language notice when we know its kind.
fn report_fatal(err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "Conversion failed");
    match err.downcast_ref::<BildbandError>() {
        Some(known) => {
            let notice = humanize_error(known);
            eprintln!("error: {}", notice.message);
            eprintln!("       {}", notice.suggestion);
        }
        None => eprintln!("error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "bildband",
            "--source",
            "photos",
            "--dest",
            "out",
            "--title",
            "Holiday",
            "--orientation",
            "landscape",
            "--paper",
            "letter",
        ])
        .unwrap();

        assert_eq!(cli.source, PathBuf::from("photos"));
        assert_eq!(cli.title, "Holiday");
        assert_eq!(
            cli.orientation.map(OrientationPolicy::from),
            Some(OrientationPolicy::Horizontal)
        );
        assert_eq!(cli.paper.map(PaperSize::from), Some(PaperSize::Letter));
        assert!(!cli.verbose);
    }

    #[test]
    fn orientation_and_paper_are_optional() {
        let cli = Cli::try_parse_from(["bildband", "-s", "in", "-d", "out", "-t", "T"]).unwrap();
        assert!(cli.orientation.is_none());
        assert!(cli.paper.is_none());
    }

    #[test]
    fn empty_title_reaches_validation() {
        let dir = std::env::temp_dir();
        let cli = Cli::try_parse_from([
            "bildband",
            "-s",
            dir.to_str().unwrap(),
            "-d",
            dir.to_str().unwrap(),
            "-t",
            "",
        ])
        .unwrap();

        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BildbandError>(),
            Some(BildbandError::Validation { field: "title", .. })
        ));
    }
}
