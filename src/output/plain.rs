//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::ScanReport;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report)
}

fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                   {} Scan Results",
        style("GhostPort").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(out, "  {} {}", style("Strategy:").bold(), report.strategy)?;
    writeln!(out, "  {} {}", style("Range:").bold(), report.range)?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} ports scanned in {:.2}s",
        style("Statistics:").bold(),
        report.probed_count,
        report.duration_ms as f64 / 1000.0
    )?;

    if report.open_ports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        let open: Vec<String> = report.open_ports.iter().map(u16::to_string).collect();
        writeln!(
            out,
            "  {} {} open: {}",
            style("Open ports:").bold(),
            style(report.open_ports.len()).green().bold(),
            style(open.join(", ")).green()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, strategy: &str, range: &str, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("GhostPort").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Strategy: {}", style("•").dim(), style(strategy).yellow());
    println!("{} Target: {}", style("•").dim(), style(target).white().bold());
    println!(
        "{} Scanning {} ports ({})...",
        style("•").dim(),
        style(ports).white().bold(),
        range
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn test_plain_lists_open_ports() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, &sample_report("box", &[22, 8080])).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Target: box"));
        assert!(text.contains("71 ports scanned in 1.23s"));
        assert!(text.contains("22, 8080"));
    }

    #[test]
    fn test_plain_no_open_ports() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, &sample_report("box", &[])).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("No open ports found."));
    }
}
