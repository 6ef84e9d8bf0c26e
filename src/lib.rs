//! # portprobe - Concurrent TCP Reachability and Banner Probing
//!
//! portprobe probes batches of (host, port) targets in parallel without
//! blocking the caller, classifies each one as open or closed, and can
//! interrogate a single service for its banner.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::config::{InterrogatorConfig, ScannerConfig};
//! use portprobe::interrogator::Interrogator;
//! use portprobe::scanner::TcpScanner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portprobe::ProbeError> {
//!     let scanner = TcpScanner::new(ScannerConfig::new())?;
//!     for port in [22, 80, 443] {
//!         scanner.submit("192.168.1.1", port)?;
//!     }
//!     scanner.wait_idle().await;
//!     for result in scanner.results() {
//!         println!("{} is {}", result, result.status);
//!     }
//!
//!     let interrogator = Interrogator::new(InterrogatorConfig::new().with_greeting("HELO"))?;
//!     interrogator.interrogate("192.168.1.1", 25)?;
//!     interrogator.wait().await;
//!     println!("{:?}", interrogator.response());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, targets and target keys
//! - [`scanner`] - The batch connect scanner and its registry and result store
//! - [`interrogator`] - Single-target greeting and bounded read
//! - [`config`] - Engine options and file-backed settings
//! - [`services`] - Well-known port names
//! - [`error`] - Error types
//! - [`output`] - Result formatting for the command line

pub mod cli;
pub mod config;
pub mod error;
pub mod interrogator;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, EngineResult, ProbeError};
pub use interrogator::Interrogator;
pub use scanner::{ProbeResult, ProbeStatus, TcpScanner};
pub use types::{Port, PortSpec, Target, TargetKey};
