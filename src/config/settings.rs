//! File-backed defaults for both engines.

use crate::config::engine::{encoding_for_label, InterrogatorConfig, ScannerConfig};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Probe settings as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Connect timeout in milliseconds; 0 leaves it to the platform.
    pub connect_timeout_ms: u64,
    /// Interrogator read timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Interrogator greeting.
    pub greeting: String,
    /// WHATWG label of the interrogator text codec.
    pub encoding: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 0,
            read_timeout_ms: 5000,
            greeting: String::new(),
            encoding: "utf-8".to_string(),
        }
    }
}

impl ProbeSettings {
    /// Load settings from a specific file.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            connect_timeout: self.connect_timeout(),
        }
    }

    pub fn interrogator_config(&self) -> ConfigResult<InterrogatorConfig> {
        let mut config = InterrogatorConfig::new()
            .with_greeting(self.greeting.clone())
            .with_encoding(encoding_for_label(&self.encoding)?)
            .with_read_timeout_ms(self.read_timeout_ms);
        config.connect_timeout = self.connect_timeout();
        Ok(config)
    }
}
