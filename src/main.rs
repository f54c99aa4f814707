//! Alphabet Chart CLI
//!
//! Usage:
//!   alphabet-chart [OPTIONS] <CHART>
//!
//! Options:
//!   -l, --letters <FILE>   Read records from a pipe-delimited letters file
//!   -o, --output <FILE>    Write here instead of the document's `output`
//!   --stdout               Print the SVG instead of writing a file
//!   --date <YYYY-MM-DD>    Date that `{date}` expands to
//!   --skip-malformed       Draw the good records when some are malformed
//!   --check                Validate the chart without writing anything
//!   -d, --debug            Log every draw operation
//!   -v, --verbose          Increase log verbosity (repeatable)
//!   -h, --help             Print help

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alphabet_chart::config::load_file;
use alphabet_chart::records::parse_letters_text;
use alphabet_chart::{
    record_chart, render_svg, write_output, Chart, ChartError, RecordPolicy, RenderOptions,
};

#[derive(Parser)]
#[command(name = "alphabet-chart")]
#[command(about = "Typographic alphabet reference charts from a TOML or YAML document")]
struct Cli {
    /// Chart document (`.toml` is read as TOML, anything else as YAML)
    chart: PathBuf,

    /// Pipe-delimited letters file replacing the document's `letters`
    #[arg(short, long)]
    letters: Option<PathBuf>,

    /// Output file (defaults to the document's `output`, relative to the document)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the SVG to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Date that `{date}` expands to, as YYYY-MM-DD (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Skip malformed records instead of rejecting the chart
    #[arg(long)]
    skip_malformed: bool,

    /// Validate the document and lay it out without writing anything
    #[arg(long)]
    check: bool,

    /// Debug mode: log every draw operation
    #[arg(short, long)]
    debug: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    // Load the document
    let config = match load_file(&cli.chart) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading chart '{}': {}", cli.chart.display(), e);
            std::process::exit(1);
        }
    };

    let policy = if cli.skip_malformed {
        RecordPolicy::SkipMalformed
    } else {
        RecordPolicy::Strict
    };

    // Records come from the letters file when given, else from the document
    let chart = match &cli.letters {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error reading letters '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            match Chart::with_records(config, parse_letters_text(&text), policy) {
                Ok(chart) => chart,
                Err(ChartError::Records(records)) => {
                    eprint!("{}", records.report(&text, &path.display().to_string()));
                    eprintln!("Error: {}", ChartError::Records(records));
                    std::process::exit(1);
                }
                Err(e) => exit_with(e),
            }
        }
        None => Chart::from_config(config, policy).unwrap_or_else(|e| exit_with(e)),
    };

    let options = RenderOptions::new()
        .with_today(cli.date.unwrap_or_else(|| Local::now().date_naive()))
        .with_policy(policy);

    if cli.debug || cli.check {
        let recorder = record_chart(&chart, options.today).unwrap_or_else(|e| exit_with(e));
        for op in recorder.ops() {
            debug!(?op, "draw");
        }
        if cli.check {
            info!(
                records = chart.records.len(),
                skipped = chart.skipped.len(),
                "chart is valid"
            );
            return;
        }
    }

    let svg = render_svg(&chart, &options).unwrap_or_else(|e| exit_with(e));

    if cli.stdout {
        println!("{}", svg);
        return;
    }

    let path = match &cli.output {
        Some(path) => path.clone(),
        None => chart.output_path(document_dir(&cli.chart)),
    };
    if path.extension().and_then(|ext| ext.to_str()) != Some("svg") {
        warn!(path = %path.display(), "output is always SVG regardless of the extension");
    }
    if let Err(e) = write_output(&path, &svg) {
        exit_with(e);
    }
}

fn exit_with(err: ChartError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

fn document_dir(chart: &Path) -> &Path {
    chart
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// `RUST_LOG` wins over the level derived from `-v` and `-d`
fn init_tracing(cli: &Cli) {
    let level = match (cli.debug, cli.verbose) {
        (true, 0..=2) => "debug",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("alphabet_chart={level}"))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
