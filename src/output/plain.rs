//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::ScanReport;
use crate::scanner::ProbeStatus;
use crate::services::service_description;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a report in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(
        out,
        "  {} {} probes in {:.2}s",
        style("Statistics:").bold(),
        report.probes,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "              {} open, {} closed, {} unfinished",
        style(report.open).green().bold(),
        style(report.closed).red(),
        style(report.unfinished).yellow()
    )?;
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "  {}", style("No results to display.").dim())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(
        out,
        "  {:<40}  {:^10}  {}",
        style("TARGET").bold(),
        style("STATE").bold(),
        style("SERVICE").bold()
    )?;
    writeln!(out, "  {}", style(RULE).dim())?;

    for result in &report.results {
        let status_style = match result.status {
            ProbeStatus::Open => Style::new().green().bold(),
            ProbeStatus::Closed => Style::new().red(),
            ProbeStatus::Connecting => Style::new().yellow(),
        };

        writeln!(
            out,
            "  {:<40}  {:^10}  {}",
            result.to_string(),
            status_style.apply_to(result.status.label()),
            service_description(result.port.as_u16())
        )?;
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(out)?;
    Ok(())
}

/// Print the outcome of an interrogation.
pub fn print_response(target: &str, response: Option<&str>) {
    match response {
        Some(text) => {
            println!("{} {}", style(target).white().bold(), style("responded:").green());
            println!("{}", text.trim_end());
        }
        None => println!("{} {}", style(target).white().bold(), style("no response").dim()),
    }
}

/// Print a scan header before probing begins.
pub fn print_scan_header(hosts: usize, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Probing {} ports on {} hosts...",
        style("•").dim(),
        style(ports).white().bold(),
        style(hosts).white().bold()
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
