//! CLI subcommand definitions and handlers.
//!
//! - `portprobe scan <host>... -p <ports>` - Probe a batch of targets
//! - `portprobe interrogate <host> <port>` - Grab one service's response

mod interrogate;
mod scan;

pub use interrogate::InterrogateCommand;
pub use scan::ScanCommand;

use crate::config::ProbeSettings;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// portprobe - Concurrent TCP reachability and banner probing.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Probe TCP targets for reachability and banners", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a JSON settings file
    #[arg(long, global = true, value_name = "PATH", env = "PORTPROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe targets for open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Connect to one target and capture its response
    #[command(alias = "i")]
    Interrogate(InterrogateCommand),
}

impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Load settings from `--config`, or defaults when none is given.
    pub fn settings(&self) -> Result<ProbeSettings> {
        match self.config.as_deref() {
            Some(path) => load_settings(path),
            None => Ok(ProbeSettings::default()),
        }
    }

    pub async fn run(self) -> Result<()> {
        let settings = self.settings()?;
        match self.command {
            Commands::Scan(cmd) => cmd.execute(&settings).await,
            Commands::Interrogate(cmd) => cmd.execute(&settings).await,
        }
    }
}

fn load_settings(path: &Path) -> Result<ProbeSettings> {
    ProbeSettings::load_from(path)
        .with_context(|| format!("loading settings from {}", path.display()))
}
