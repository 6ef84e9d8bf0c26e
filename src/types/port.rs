//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` handles list and range specifications on the command line.

use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Port {
    type Error = ProbeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| {
                ProbeError::invalid("port", format!("{} is out of range (1-65535)", value))
            })
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port specification parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// A list of ports built from a specification like `"22,80,443,8000-9000"`.
///
/// Ports come out sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSpec {
    ports: Vec<Port>,
}

impl PortSpec {
    /// All ports as a sorted, deduplicated slice.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

fn parse_port(s: &str) -> Result<Port, PortError> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut ports = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_port(start)?;
                    let end = parse_port(end)?;
                    if start > end {
                        return Err(PortError::InvalidRange(start.0, end.0));
                    }
                    ports.extend((start.0..=end.0).map(Port));
                }
                None => ports.push(parse_port(part)?),
            }
        }

        if ports.is_empty() {
            return Err(PortError::Empty);
        }
        ports.sort_unstable();
        ports.dedup();
        Ok(Self { ports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_port_try_from_u32() {
        assert_eq!(Port::try_from(80u32).unwrap().as_u16(), 80);
        assert!(matches!(
            Port::try_from(0u32),
            Err(ProbeError::InvalidArgument { argument: "port", .. })
        ));
        assert!(Port::try_from(65536u32).is_err());
    }

    #[test]
    fn test_port_spec_parsing() {
        let spec: PortSpec = "80".parse().unwrap();
        assert_eq!(spec.len(), 1);

        let spec: PortSpec = "22,80,443,8000-8010".parse().unwrap();
        assert_eq!(spec.len(), 14);
        assert_eq!(spec.ports()[0].as_u16(), 22);
    }

    #[test]
    fn test_port_spec_dedup() {
        let spec: PortSpec = "80,80,443,79-81".parse().unwrap();
        let raw: Vec<u16> = spec.ports().iter().map(|p| p.as_u16()).collect();
        assert_eq!(raw, vec![79, 80, 81, 443]);
    }

    #[test]
    fn test_port_spec_errors() {
        assert!(matches!("".parse::<PortSpec>(), Err(PortError::Empty)));
        assert!(matches!("0".parse::<PortSpec>(), Err(PortError::OutOfRange(0))));
        assert!(matches!(
            "90-80".parse::<PortSpec>(),
            Err(PortError::InvalidRange(90, 80))
        ));
        assert!(matches!(
            "http".parse::<PortSpec>(),
            Err(PortError::InvalidFormat(_))
        ));
    }
}
