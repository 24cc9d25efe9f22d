//! Line-oriented text output.

use super::ScanReport;
use crate::error::OutputResult;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Write a report as `key: value` lines followed by a blank line.
pub fn write_text<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let open: Vec<String> = report.open_ports.iter().map(u16::to_string).collect();

    writeln!(out, "target: {}", report.target)?;
    writeln!(out, "strategy: {}", report.strategy)?;
    writeln!(out, "range: {}", report.range)?;
    writeln!(out, "open_ports: {}", open.join(", "))?;
    writeln!(out, "probed_count: {}", report.probed_count)?;
    writeln!(out, "duration_ms: {}", report.duration_ms)?;
    writeln!(out, "completed_at: {}", report.completed_at.to_rfc3339())?;
    writeln!(out)?;
    Ok(())
}

/// Append a report to a text file, creating it if needed.
pub fn save_text(path: &Path, report: &ScanReport) -> OutputResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write_text(&mut file, report)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;
    use std::fs;

    #[test]
    fn test_write_text_lines() {
        let mut buf = Vec::new();
        write_text(&mut buf, &sample_report("h", &[22, 80])).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("target: h\n"));
        assert!(text.contains("open_ports: 22, 80\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_save_text_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");

        save_text(&path, &sample_report("first", &[22])).unwrap();
        save_text(&path, &sample_report("second", &[])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("target: ").count(), 2);
        assert!(text.find("first").unwrap() < text.find("second").unwrap());
    }
}
