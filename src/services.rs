//! Service detection based on well-known port numbers.
//!
//! Maps the handful of TCP ports the prober reports by name.

use serde::Serialize;
use std::fmt;

/// Well-known TCP services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TcpService {
    Echo,
    FtpData,
    Ftp,
    Ssh,
    Telnet,
    Smtp,
    Dns,
    Http,
    Kerberos,
    Pop3,
    HttpTls,
    Smb,
    SqlServer,
    HttpInternal,
}

impl TcpService {
    /// Look up the service usually found on `port`.
    ///
    /// Returns `None` if the port is not in the table.
    pub fn from_port(port: u16) -> Option<Self> {
        let service = match port {
            7 => Self::Echo,
            20 => Self::FtpData,
            21 => Self::Ftp,
            22 => Self::Ssh,
            23 => Self::Telnet,
            25 => Self::Smtp,
            53 => Self::Dns,
            80 => Self::Http,
            88 => Self::Kerberos,
            110 => Self::Pop3,
            443 => Self::HttpTls,
            445 => Self::Smb,
            1433 => Self::SqlServer,
            8080 => Self::HttpInternal,
            _ => return None,
        };
        Some(service)
    }

    pub const fn port(self) -> u16 {
        match self {
            Self::Echo => 7,
            Self::FtpData => 20,
            Self::Ftp => 21,
            Self::Ssh => 22,
            Self::Telnet => 23,
            Self::Smtp => 25,
            Self::Dns => 53,
            Self::Http => 80,
            Self::Kerberos => 88,
            Self::Pop3 => 110,
            Self::HttpTls => 443,
            Self::Smb => 445,
            Self::SqlServer => 1433,
            Self::HttpInternal => 8080,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::FtpData => "ftp-data",
            Self::Ftp => "ftp",
            Self::Ssh => "ssh",
            Self::Telnet => "telnet",
            Self::Smtp => "smtp",
            Self::Dns => "dns",
            Self::Http => "http",
            Self::Kerberos => "kerberos",
            Self::Pop3 => "pop3",
            Self::HttpTls => "https",
            Self::Smb => "smb",
            Self::SqlServer => "sql-server",
            Self::HttpInternal => "http-internal",
        }
    }
}

impl fmt::Display for TcpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Get a descriptive string for the service on a port.
///
/// Returns "unknown" if the port is not recognized.
pub fn service_description(port: u16) -> &'static str {
    TcpService::from_port(port).map_or("unknown", TcpService::name)
}
