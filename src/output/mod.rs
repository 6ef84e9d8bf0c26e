//! Output formatting module.
//!
//! Provides formatters for plain text and JSON output of probe results.

mod json_format;
mod plain;

pub use json_format::print_json;
pub use plain::{print_error, print_plain, print_response, print_scan_header, print_warning};

use crate::scanner::{ProbeResult, ProbeStatus};
use clap::ValueEnum;
use serde::Serialize;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Plain,
    /// Pretty-printed JSON
    Json,
}

/// A settled scan batch, ready for printing.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub probes: usize,
    pub open: usize,
    pub closed: usize,
    /// Attempts still in flight when the wait gave up.
    pub unfinished: usize,
    pub duration_ms: u64,
    pub results: Vec<ProbeResult>,
}

impl ScanReport {
    /// Build a report, sorting results by address then port.
    ///
    /// Closed results are counted but only listed when `show_closed` is set.
    pub fn new(
        mut results: Vec<ProbeResult>,
        unfinished: usize,
        elapsed: Duration,
        show_closed: bool,
    ) -> Self {
        let open = results.iter().filter(|r| r.is_open()).count();
        let closed = results
            .iter()
            .filter(|r| r.status == ProbeStatus::Closed)
            .count();
        let probes = results.len() + unfinished;

        if !show_closed {
            results.retain(|r| r.status != ProbeStatus::Closed);
        }
        results.sort_by_key(|r| (r.host.parse::<IpAddr>().ok(), r.port));

        Self {
            probes,
            open,
            closed,
            unfinished,
            duration_ms: elapsed.as_millis() as u64,
            results,
        }
    }
}

/// Format and print a report according to the specified format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;

    fn done(host: &str, port: u32, status: ProbeStatus) -> ProbeResult {
        ProbeResult::connecting(&Target::parse(host, port).unwrap()).finalized(status)
    }

    #[test]
    fn test_report_counts_and_filters() {
        let results = vec![
            done("10.0.0.2", 80, ProbeStatus::Open),
            done("10.0.0.1", 443, ProbeStatus::Closed),
            done("10.0.0.1", 22, ProbeStatus::Open),
        ];

        let report = ScanReport::new(results.clone(), 1, Duration::from_millis(1500), false);
        assert_eq!(report.probes, 4);
        assert_eq!(report.open, 2);
        assert_eq!(report.closed, 1);
        assert_eq!(report.duration_ms, 1500);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].host, "10.0.0.1");

        let report = ScanReport::new(results, 0, Duration::ZERO, true);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[1].port.as_u16(), 443);
    }

    #[test]
    fn test_report_sorts_by_address() {
        let results = vec![
            done("10.0.0.10", 22, ProbeStatus::Open),
            done("10.0.0.2", 80, ProbeStatus::Open),
            done("10.0.0.2", 22, ProbeStatus::Open),
            done("9.0.0.1", 443, ProbeStatus::Open),
        ];

        let report = ScanReport::new(results, 0, Duration::ZERO, false);
        let order: Vec<String> = report.results.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            order,
            vec![
                "9.0.0.1-00443",
                "10.0.0.2-00022",
                "10.0.0.2-00080",
                "10.0.0.10-00022"
            ]
        );
    }
}
