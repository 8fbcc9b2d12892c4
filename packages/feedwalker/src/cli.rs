//! Command-line interface for feedwalker.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::FetchConfig;
use crate::error::Result;
use crate::render::{render, write_output, OutputFormat};
use crate::source::FeedSource;
use crate::types::{FeedKind, FeedRecords};
use crate::walker::{parse_entries, parse_sales};

/// Feedwalker - Extract records from Atom-style and sales XML feeds.
#[derive(Parser)]
#[command(name = "feedwalker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a feed from a URL or file and print its records.
    Parse {
        /// Feed URL (http/https) or path to a local XML file
        source: String,

        /// Feed layout
        #[arg(short, long, value_enum, default_value_t = FeedKind::Atom)]
        kind: FeedKind,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Include entry summaries in text and HTML output
        #[arg(short, long)]
        summaries: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum response size in bytes for remote feeds
        #[arg(long)]
        max_size: Option<u64>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            source,
            kind,
            format,
            summaries,
            output,
            max_size,
        } => parse_command(
            &source,
            kind,
            format,
            summaries,
            output.as_deref(),
            max_size,
        ),
    }
}

/// Execute the parse command.
fn parse_command(
    source: &str,
    kind: FeedKind,
    format: OutputFormat,
    summaries: bool,
    output: Option<&Path>,
    max_size: Option<u64>,
) -> Result<()> {
    // Validate inputs before touching the network
    let source: FeedSource = source.parse()?;
    let mut config = FetchConfig::from_env()?;
    if let Some(max_size) = max_size {
        config = config.with_max_response_size(max_size);
    }
    config.validate()?;

    let pb = source.is_remote().then(|| {
        let pb = ProgressBar::new_spinner();
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        pb.set_message(format!("Fetching {source}..."));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    });

    let result = source
        .open(&config)
        .and_then(|stream| walk(stream, kind));

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let records = result?;

    let rendered = render(&records, format, summaries)?;
    write_output(&rendered, output)?;

    if format == OutputFormat::Text || output.is_some() {
        eprintln!(
            "{} {} {} from {}",
            style("Parsed").green().bold(),
            style(records.len()).bold(),
            record_noun(kind, records.len()),
            style(&source).cyan()
        );
    }
    if let Some(path) = output {
        eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
    }

    Ok(())
}

fn walk(stream: Box<dyn Read>, kind: FeedKind) -> Result<FeedRecords> {
    match kind {
        FeedKind::Atom => parse_entries(stream).map(FeedRecords::Entries),
        FeedKind::Sales => parse_sales(stream).map(FeedRecords::Sales),
    }
}

fn record_noun(kind: FeedKind, count: usize) -> &'static str {
    match (kind, count == 1) {
        (FeedKind::Atom, true) => "entry",
        (FeedKind::Atom, false) => "entries",
        (FeedKind::Sales, true) => "sale",
        (FeedKind::Sales, false) => "sales",
    }
}
