//! In-process configuration for the probe engines.

use crate::error::{ConfigError, ConfigResult};
use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Read timeout for the interrogator's single read.
///
/// Values outside the accepted window fall back to the default instead of
/// being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadTimeout(Duration);

impl ReadTimeout {
    /// Fallback for out-of-range values, in milliseconds.
    pub const DEFAULT_MS: u64 = 5000;
    /// Smallest accepted value, in milliseconds.
    pub const MIN_MS: u64 = 101;
    /// Largest accepted value, in milliseconds.
    pub const MAX_MS: u64 = 29_999;

    pub fn from_millis(ms: u64) -> Self {
        if (Self::MIN_MS..=Self::MAX_MS).contains(&ms) {
            Self(Duration::from_millis(ms))
        } else {
            warn!(
                requested_ms = ms,
                default_ms = Self::DEFAULT_MS,
                "read timeout out of range, using default"
            );
            Self(Duration::from_millis(Self::DEFAULT_MS))
        }
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        self.0.as_millis() as u64
    }
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self(Duration::from_millis(Self::DEFAULT_MS))
    }
}

impl fmt::Display for ReadTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// Look up a text codec by its WHATWG label, e.g. `"utf-8"` or `"latin1"`.
pub fn encoding_for_label(label: &str) -> ConfigResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))
}

/// Configuration for the batch scanner.
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Upper bound on the connect phase. `None` leaves it to the platform.
    pub connect_timeout: Option<Duration>,
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

/// Configuration for the single-target interrogator.
#[derive(Debug, Clone)]
pub struct InterrogatorConfig {
    /// Text sent right after the connection is established. Empty means none.
    pub greeting: Option<String>,
    /// Codec for the greeting and the response.
    pub encoding: &'static Encoding,
    /// Applies to the read only, never to the connect.
    pub read_timeout: ReadTimeout,
    /// Upper bound on the connect phase. `None` leaves it to the platform.
    pub connect_timeout: Option<Duration>,
}

impl Default for InterrogatorConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            encoding: UTF_8,
            read_timeout: ReadTimeout::default(),
            connect_timeout: None,
        }
    }
}

impl InterrogatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the greeting; an empty string clears it.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        self.greeting = (!greeting.is_empty()).then_some(greeting);
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the codec by label.
    pub fn with_encoding_label(self, label: &str) -> ConfigResult<Self> {
        Ok(self.with_encoding(encoding_for_label(label)?))
    }

    /// Set the read timeout, clamping out-of-range values to the default.
    pub fn with_read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout = ReadTimeout::from_millis(ms);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_timeout_clamp() {
        assert_eq!(ReadTimeout::from_millis(50).as_millis(), 5000);
        assert_eq!(ReadTimeout::from_millis(40_000).as_millis(), 5000);
        assert_eq!(ReadTimeout::from_millis(3000).as_millis(), 3000);
    }

    #[test]
    fn test_read_timeout_bounds() {
        assert_eq!(ReadTimeout::from_millis(100).as_millis(), 5000);
        assert_eq!(ReadTimeout::from_millis(101).as_millis(), 101);
        assert_eq!(ReadTimeout::from_millis(29_999).as_millis(), 29_999);
        assert_eq!(ReadTimeout::from_millis(30_000).as_millis(), 5000);
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!(encoding_for_label("utf-8").unwrap(), UTF_8);
        assert_eq!(
            encoding_for_label("latin1").unwrap(),
            encoding_rs::WINDOWS_1252
        );
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(ConfigError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_interrogator_builder() {
        let config = InterrogatorConfig::new()
            .with_greeting("HELO")
            .with_read_timeout_ms(40_000)
            .with_encoding_label("ascii")
            .unwrap();

        assert_eq!(config.greeting.as_deref(), Some("HELO"));
        assert_eq!(config.read_timeout, ReadTimeout::default());
        assert_eq!(config.encoding, encoding_rs::WINDOWS_1252);
        assert!(InterrogatorConfig::new().with_greeting("").greeting.is_none());
    }
}
