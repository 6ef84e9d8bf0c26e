//! Configuration management for portprobe.
//!
//! Engine options are built in process; [`ProbeSettings`] can also load
//! defaults for both engines from a JSON file.

mod engine;
mod settings;

pub use engine::{encoding_for_label, InterrogatorConfig, ReadTimeout, ScannerConfig};
pub use settings::ProbeSettings;
