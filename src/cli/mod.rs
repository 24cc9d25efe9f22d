//! Command-line interface definitions for ghostport.
//!
//! Uses `clap` derive macros for declarative argument parsing. The scan
//! itself is driven from [`scan`].

mod scan;

use clap::Parser;
use std::path::PathBuf;

/// GhostPort - a TCP connect port scanner with selectable strategies.
///
/// Strategies (by --mode number or --strategy name):
///   1 sequential          one port at a time
///   2 fast-sequential     sequential with a short timeout
///   3 worker-pool         fixed pool of worker threads
///   4 bounded-concurrent  async probes gated by a semaphore
///   5 stealth             slow sequential with a pause between probes
///   6 aggressive          wide async fan-out with a tight timeout
///   7 balanced            moderate worker pool
#[derive(Parser, Debug)]
#[command(name = "ghostport")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A TCP connect port scanner", long_about)]
pub struct Cli {
    /// Target hostname or IP address
    #[arg(short = 'T', long, value_name = "HOST")]
    pub target: String,

    /// Port or port range to scan, e.g. "80" or "1-1024" [default: 1-1024]
    #[arg(short, long, value_name = "N|N-M")]
    pub range: Option<String>,

    /// Strategy by number (1-7)
    #[arg(
        short,
        long,
        value_name = "1-7",
        conflicts_with = "strategy",
        allow_negative_numbers = true
    )]
    pub mode: Option<i64>,

    /// Strategy by name
    #[arg(short, long, value_name = "NAME")]
    pub strategy: Option<String>,

    /// Connection timeout in milliseconds (overrides the strategy default)
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Worker threads or in-flight probes (overrides the strategy default)
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Delay between sequential probes in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Save results to a .txt, .csv or .json file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "GHOSTPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (progress bar and debug logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
