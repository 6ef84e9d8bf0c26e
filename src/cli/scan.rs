//! Scan subcommand implementation.
//!
//! Handles the `portprobe scan <host>...` command.

use crate::config::ProbeSettings;
use crate::output::{self, OutputFormat, ScanReport};
use crate::scanner::TcpScanner;
use crate::types::{PortSpec, Target};
use anyhow::{Context, Result};
use clap::Parser;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

/// Probe a batch of targets for open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// IPv4 or IPv6 addresses to probe
    #[arg(value_name = "HOST", required = true)]
    pub hosts: Vec<String>,

    /// Ports to probe (e.g., "80", "80,443", "1-1000", "22,80,443,8000-9000")
    #[arg(short, long, default_value = "7,20-23,25,53,80,88,110,443,445,1433,8080")]
    pub ports: PortSpec,

    /// Connect timeout in milliseconds (overrides the settings file)
    #[arg(short = 't', long, value_name = "MS")]
    pub connect_timeout_ms: Option<u64>,

    /// Give up waiting for the batch after this many milliseconds
    #[arg(short, long, value_name = "MS", default_value = "30000")]
    pub wait_ms: u64,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Show closed ports in output
    #[arg(long)]
    pub show_closed: bool,
}

impl ScanCommand {
    pub async fn execute(&self, settings: &ProbeSettings) -> Result<()> {
        let targets = self.targets()?;

        let mut config = settings.scanner_config();
        if let Some(ms) = self.connect_timeout_ms {
            config = config.with_connect_timeout(Duration::from_millis(ms));
        }
        let scanner = TcpScanner::new(config)?;

        if self.output == OutputFormat::Plain {
            output::print_scan_header(self.hosts.len(), self.ports.len());
        }

        let start = Instant::now();
        let submitted = targets
            .into_iter()
            .filter(|target| scanner.submit_target(target.clone()))
            .count();
        info!(submitted, "batch submitted");

        let wait = Duration::from_millis(self.wait_ms);
        if timeout(wait, scanner.wait_idle()).await.is_err() {
            let pending = scanner.in_flight().len();
            warn!(pending, wait_ms = self.wait_ms, "batch did not settle");
            output::print_warning(&format!(
                "{} probes still connecting after {}ms",
                pending, self.wait_ms
            ));
        }

        let report = ScanReport::new(
            scanner.results(),
            scanner.in_flight().len(),
            start.elapsed(),
            self.show_closed,
        );
        output::print_report(&report, self.output).context("writing results")?;
        Ok(())
    }

    /// Validate every (host, port) pair before anything is submitted.
    fn targets(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::with_capacity(self.hosts.len() * self.ports.len());
        for host in &self.hosts {
            for port in self.ports.ports() {
                let target = Target::parse(host, u32::from(port.as_u16()))
                    .with_context(|| format!("invalid target {}", host))?;
                targets.push(target);
            }
        }
        Ok(targets)
    }
}
