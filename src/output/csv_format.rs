//! CSV output formatting.

use super::ScanReport;
use crate::error::OutputResult;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const HEADER: [&str; 3] = ["target", "port", "status"];

/// Write one `target,port,status` row per open port.
fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    report: &ScanReport,
    header: bool,
) -> csv::Result<()> {
    if header {
        wtr.write_record(HEADER)?;
    }

    for port in &report.open_ports {
        let port = port.to_string();
        wtr.write_record([report.target.as_str(), port.as_str(), "open"])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_rows(&mut wtr, report, true)?;
    Ok(())
}

/// Append rows to a CSV file. The header is written only when the file is new.
pub fn save_csv(path: &Path, report: &ScanReport) -> OutputResult<()> {
    let is_new = path.metadata().map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    write_rows(&mut wtr, report, is_new)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;
    use std::fs;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");

        save_csv(&path, &sample_report("10.0.0.1", &[22, 80])).unwrap();
        save_csv(&path, &sample_report("10.0.0.2", &[443])).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "target,port,status",
                "10.0.0.1,22,open",
                "10.0.0.1,80,open",
                "10.0.0.2,443,open",
            ]
        );
    }

    #[test]
    fn test_no_open_ports_only_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        save_csv(&path, &sample_report("h", &[])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "target,port,status");
    }
}
