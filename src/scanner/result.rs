//! Probe outcomes.
//!
//! A [`ProbeResult`] is a plain value: it is built in the `connecting` state,
//! replaced wholesale by its terminal copy when the attempt resolves, and never
//! changed after that.

use crate::services::TcpService;
use crate::types::{Port, Target, TargetKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Status of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Connection attempt still in flight.
    Connecting,
    /// Handshake completed.
    Open,
    /// Refused, unreachable, reset or timed out.
    Closed,
}

impl ProbeStatus {
    /// Numeric status code: 0 open, 1 closed, 99 in progress.
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Connecting => 99,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Connecting)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of probing a single target.
///
/// Equality and hashing cover the host (ignoring ASCII case), port and status.
/// The captured response text is deliberately left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Host as supplied by the caller.
    pub host: String,
    pub port: Port,
    pub status: ProbeStatus,
    /// Decoded response text, when one was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ProbeResult {
    /// A result in the `connecting` state.
    pub fn connecting(target: &Target) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            status: ProbeStatus::Connecting,
            response: None,
        }
    }

    /// Copy of this result in a terminal state.
    pub fn finalized(&self, status: ProbeStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_response(mut self, response: Option<String>) -> Self {
        self.response = response;
        self
    }

    pub fn code(&self) -> u8 {
        self.status.code()
    }

    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn is_open(&self) -> bool {
        self.status == ProbeStatus::Open
    }

    /// Service usually found on this result's port.
    pub fn service(&self) -> Option<TcpService> {
        TcpService::from_port(self.port.as_u16())
    }

    /// Registry key for this result's target, when the host still parses.
    pub fn key(&self) -> Option<TargetKey> {
        let ip = self.host.parse().ok()?;
        Some(TargetKey::new(ip, self.port))
    }
}

impl PartialEq for ProbeResult {
    fn eq(&self, other: &Self) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.port == other.port
            && self.status == other.status
    }
}

impl Eq for ProbeResult {}

impl Hash for ProbeResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.to_ascii_lowercase().hash(state);
        self.port.hash(state);
        self.status.hash(state);
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:05}", self.host, self.port.as_u16())
    }
}
