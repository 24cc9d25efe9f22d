//! Output formatting module.
//!
//! Renders a finished scan to the console and persists it to `.txt`, `.csv`
//! or `.json` files. File output never loses a result: on any failure the
//! report is printed to the console instead.

mod csv_format;
mod json_format;
mod plain;
mod text_format;

pub use csv_format::{print_csv, save_csv};
pub use json_format::{print_json, save_json};
pub use plain::{print_error, print_plain, print_scan_header, print_success, print_warning};
pub use text_format::{save_text, write_text};

use crate::cli::OutputFormat;
use crate::error::{OutputError, OutputResult};
use crate::scanner::{ScanConfig, ScanOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Serializable summary of a completed scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target as given by the user.
    pub target: String,
    /// Strategy name.
    pub strategy: String,
    /// Port range, `N` or `N-M`.
    pub range: String,
    /// Open ports, ascending.
    pub open_ports: Vec<u16>,
    /// Number of ports probed.
    pub probed_count: usize,
    /// Scan duration in milliseconds.
    pub duration_ms: u64,
    /// When the scan finished.
    pub completed_at: DateTime<Utc>,
}

impl ScanReport {
    /// Build a report from the configuration and outcome of a scan.
    pub fn new(config: &ScanConfig, outcome: &ScanOutcome) -> Self {
        Self {
            target: config.target.trim().to_string(),
            strategy: config.strategy.to_string(),
            range: config.range.to_string(),
            open_ports: outcome.open_ports.iter().map(|p| p.as_u16()).collect(),
            probed_count: outcome.probed_count,
            duration_ms: outcome.duration.as_millis() as u64,
            completed_at: Utc::now(),
        }
    }

    /// One-line summary of the scan, ending with the open ports in order.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} - {} open of {} probed [{:.2}s]",
            self.target,
            self.open_ports.len(),
            self.probed_count,
            self.duration_ms as f64 / 1000.0
        );
        if !self.open_ports.is_empty() {
            let open: Vec<String> = self.open_ports.iter().map(u16::to_string).collect();
            line.push_str(": ");
            line.push_str(&open.join(", "));
        }
        line
    }
}

/// File format selected by the output path's extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFile {
    Text(PathBuf),
    Csv(PathBuf),
    Json(PathBuf),
}

impl OutputFile {
    /// Pick a writer from the file extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") => Ok(Self::Text(path.to_path_buf())),
            Some("csv") => Ok(Self::Csv(path.to_path_buf())),
            Some("json") => Ok(Self::Json(path.to_path_buf())),
            _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Text(p) | Self::Csv(p) | Self::Json(p) => p,
        }
    }

    /// Write the report to this file.
    pub fn save(&self, report: &ScanReport) -> OutputResult<()> {
        match self {
            Self::Text(p) => save_text(p, report),
            Self::Csv(p) => save_csv(p, report),
            Self::Json(p) => save_json(p, report),
        }
    }
}

/// Save a report to `path`, selecting the format from its extension.
pub fn save_report(report: &ScanReport, path: impl AsRef<Path>) -> OutputResult<PathBuf> {
    let file = OutputFile::from_path(path)?;
    file.save(report)?;
    Ok(file.path().to_path_buf())
}

/// Save a report, falling back to the console when the file cannot be written.
///
/// Returns `true` if the report reached the file.
pub fn save_or_print(report: &ScanReport, path: impl AsRef<Path>) -> bool {
    match save_report(report, path) {
        Ok(saved) => {
            print_success(&format!("Results saved to {}", saved.display()));
            true
        }
        Err(e) => {
            warn!(error = %e, "could not write results file");
            match e {
                OutputError::UnsupportedFormat(_) => {
                    print_warning("Unsupported file format. Please use .txt, .csv, or .json")
                }
                other => print_warning(&format!("Error saving results: {}", other)),
            }
            print_warning("Printing results to console instead:");
            if let Err(e) = write_text(&mut io::stdout().lock(), report) {
                print_error(&format!("failed to print results: {}", e));
            }
            false
        }
    }
}

/// Print a report to stdout in the requested format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scanner::{ProbeResult, StrategyKind};
    use crate::types::{Port, PortRange};
    use std::time::Duration;

    pub fn sample_report(target: &str, open: &[u16]) -> ScanReport {
        let config = ScanConfig::new(
            target,
            PortRange::from_bounds(20, 90).unwrap(),
            StrategyKind::Balanced,
        );
        let outcome = ScanOutcome {
            open_ports: open.iter().filter_map(|&p| Port::new(p)).collect(),
            duration: Duration::from_millis(1234),
            probed_count: 71,
        };
        ScanReport::new(&config, &outcome)
    }

    #[test]
    fn test_report_from_outcome() {
        let report = sample_report(" host.local ", &[22, 80]);
        assert_eq!(report.target, "host.local");
        assert_eq!(report.strategy, "balanced");
        assert_eq!(report.range, "20-90");
        assert_eq!(report.open_ports, vec![22, 80]);
        assert_eq!(report.summary(), "host.local - 2 open of 71 probed [1.23s]: 22, 80");
    }

    #[test]
    fn test_summary_lists_ports_in_order() {
        let config = ScanConfig::new(
            "box",
            PortRange::from_bounds(1, 9000).unwrap(),
            StrategyKind::Aggressive,
        );
        let results: Vec<ProbeResult> = [8080, 22, 443]
            .iter()
            .map(|&p| ProbeResult::open(Port::new(p).unwrap()))
            .collect();
        let outcome = ScanOutcome::from_results(&results, Duration::from_millis(10));
        let report = ScanReport::new(&config, &outcome);
        assert_eq!(report.summary(), "box - 3 open of 3 probed [0.01s]: 22, 443, 8080");

        let none = sample_report("box", &[]);
        assert_eq!(none.summary(), "box - 0 open of 71 probed [1.23s]");
    }

    #[test]
    fn test_output_file_from_extension() {
        assert!(matches!(OutputFile::from_path("a.txt"), Ok(OutputFile::Text(_))));
        assert!(matches!(OutputFile::from_path("a.CSV"), Ok(OutputFile::Csv(_))));
        assert!(matches!(OutputFile::from_path("dir/a.json"), Ok(OutputFile::Json(_))));
        assert!(matches!(
            OutputFile::from_path("a.xml"),
            Err(OutputError::UnsupportedFormat(_))
        ));
        assert!(OutputFile::from_path("noext").is_err());
    }

    #[test]
    fn test_save_or_print_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report("10.0.0.1", &[443]);

        assert!(!save_or_print(&report, dir.path().join("out.xml")));
        assert!(!dir.path().join("out.xml").exists());

        // Parent directory does not exist, so the write fails.
        assert!(!save_or_print(&report, dir.path().join("missing/out.txt")));

        assert!(save_or_print(&report, dir.path().join("out.txt")));
    }
}
