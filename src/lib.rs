//! # GhostPort - TCP connect port scanning with selectable strategies
//!
//! GhostPort probes a single host over an inclusive port range and reports
//! which ports accept a TCP connection. How the probes are scheduled is up
//! to the chosen strategy:
//!
//! - **Sequential** one probe at a time, optionally paced (the stealth preset)
//! - **Worker pool** a fixed number of OS threads making blocking connects
//! - **Bounded concurrent** async probes on one task behind a semaphore
//!
//! Whatever the strategy, the open ports come back sorted and deduplicated.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use ghostport::scanner::{run_scan, ScanConfig, StrategyKind};
//! use ghostport::types::PortRange;
//!
//! #[tokio::main]
//! async fn main() {
//!     let range: PortRange = "1-1024".parse().unwrap();
//!     let config = ScanConfig::new("127.0.0.1", range, StrategyKind::BoundedConcurrent);
//!
//!     let outcome = run_scan(config).await.unwrap();
//!     println!("open: {:?} in {:?}", outcome.open_ports, outcome.duration);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - validated port and port range types
//! - [`scanner`] - the probe, the strategies, and the orchestrator
//! - [`output`] - console rendering and `.txt`/`.csv`/`.json` persistence
//! - [`config`] - settings file handling
//! - [`cli`] - command-line front end
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, OutputError, ProbeError, ScanError};
pub use scanner::{run_scan, ProbeResult, ScanConfig, ScanOutcome, StrategyKind};
pub use types::{Port, PortRange};
