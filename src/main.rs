//! CLI entry point for the imgfetch tool.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use imgfetch_core::pipeline::{BatchSummary, FetchConfig, FetchPipeline};
use imgfetch_core::parse_input;
use tracing::{debug, info, warn};

mod cli;
mod report;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    // Read input: from positional args or stdin
    let input_text = if args.urls.is_empty() {
        if io::stdin().is_terminal() {
            eprintln!("No input provided. Pipe URLs via stdin or pass them as arguments.");
            eprintln!("Example: echo 'https://example.com/cat.png' | imgfetch");
            return Ok(());
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        args.urls.join("\n")
    };

    // Parse input to extract URLs
    let parse_result = parse_input(&input_text);

    for skipped in &parse_result.skipped {
        warn!(skipped = %skipped, "Skipped unrecognized input");
    }

    if parse_result.is_empty() {
        eprintln!("No valid URLs found in input");
        return Ok(());
    }

    info!(
        urls = parse_result.len(),
        skipped = parse_result.skipped_count(),
        "Parsed input"
    );

    let config = FetchConfig {
        dest_dir: args.dir.clone(),
        request_timeout_secs: args.timeout,
        max_bytes: args.max_bytes,
        request_delay: Duration::from_millis(args.delay_ms),
    };
    let pipeline = FetchPipeline::new(config);

    let reports = pipeline.run_batch(&parse_result.url_strings()).await?;
    let summary = BatchSummary::from_reports(&reports);

    if args.json {
        let rows: Vec<report::ReportRow> = reports.iter().map(report::ReportRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for url_report in &reports {
            println!("{}", report::render_line(url_report));
        }
        println!("{}", report::render_summary(&summary));
    }

    Ok(())
}
