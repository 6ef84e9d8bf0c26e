//! Probe targets and their canonical keys.
//!
//! A [`Target`] is a validated (host, port) pair. Its [`TargetKey`] identifies
//! it in the session registry and reads well in logs.

use crate::error::{EngineResult, ProbeError};
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A (host, port) pair that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// The host exactly as supplied by the caller.
    pub host: String,
    /// The parsed address.
    pub ip: IpAddr,
    pub port: Port,
}

impl Target {
    /// Validate a raw (host, port) pair.
    ///
    /// The host must be a non-empty IPv4 or IPv6 literal and the port must lie
    /// in 1-65535. Hostnames are not resolved.
    pub fn parse(host: &str, port: u32) -> EngineResult<Self> {
        if host.is_empty() {
            return Err(ProbeError::invalid("host", "host is empty"));
        }
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ProbeError::invalid("host", format!("'{}' is not an IP address", host)))?;
        let port = Port::try_from(port)?;

        Ok(Self {
            host: host.to_string(),
            ip,
            port,
        })
    }

    /// Socket address to connect to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port.as_u16())
    }

    pub fn key(&self) -> TargetKey {
        TargetKey::new(self.ip, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Canonical identifier for a target: `<ip>-<port padded to five digits>`.
///
/// The address is rendered from its parsed form, so `"FE80::1"` and `"fe80::1"`
/// produce the same key. Neither IPv4 nor IPv6 text contains `-`, which keeps
/// the key unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetKey(String);

impl TargetKey {
    pub fn new(ip: IpAddr, port: Port) -> Self {
        Self(format!("{}-{:05}", ip, port.as_u16()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        let target = Target::parse("192.168.1.1", 80).unwrap();
        assert!(target.ip.is_ipv4());
        assert_eq!(target.port.as_u16(), 80);
        assert_eq!(target.to_string(), "192.168.1.1:80");
    }

    #[test]
    fn test_parse_ipv6() {
        let target = Target::parse("::1", 22).unwrap();
        assert!(target.ip.is_ipv6());
        assert_eq!(target.to_string(), "[::1]:22");
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(matches!(
            Target::parse("", 80),
            Err(ProbeError::InvalidArgument { argument: "host", .. })
        ));
        assert!(matches!(
            Target::parse("example.com", 80),
            Err(ProbeError::InvalidArgument { argument: "host", .. })
        ));
        assert!(matches!(
            Target::parse("10.0.0.1", 0),
            Err(ProbeError::InvalidArgument { argument: "port", .. })
        ));
        assert!(matches!(
            Target::parse("10.0.0.1", 65536),
            Err(ProbeError::InvalidArgument { argument: "port", .. })
        ));
    }

    #[test]
    fn test_key_format() {
        let target = Target::parse("127.0.0.1", 80).unwrap();
        assert_eq!(target.key().as_str(), "127.0.0.1-00080");
    }

    #[test]
    fn test_key_ignores_host_case() {
        let upper = Target::parse("FE80::ABCD", 443).unwrap();
        let lower = Target::parse("fe80::abcd", 443).unwrap();
        assert_eq!(upper.key(), lower.key());
        assert_ne!(upper.host, lower.host);
    }

    #[test]
    fn test_key_distinguishes_ports() {
        let a = Target::parse("10.0.0.1", 8).unwrap();
        let b = Target::parse("10.0.0.1", 80).unwrap();
        assert_ne!(a.key(), b.key());
    }
}
