//! Interrogate subcommand implementation.

use crate::config::{encoding_for_label, ProbeSettings};
use crate::interrogator::Interrogator;
use crate::output;
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::time::timeout;

/// Connect to one target, send an optional greeting, and print the reply.
#[derive(Parser, Debug)]
pub struct InterrogateCommand {
    /// IPv4 or IPv6 address
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Port number
    #[arg(value_name = "PORT")]
    pub port: u32,

    /// Text to send once connected
    #[arg(short, long)]
    pub greeting: Option<String>,

    /// Text encoding label for the greeting and response (e.g. utf-8, latin1)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Read timeout in milliseconds (101-29999, otherwise 5000)
    #[arg(short, long, value_name = "MS")]
    pub read_timeout_ms: Option<u64>,

    /// Give up waiting after this many milliseconds
    #[arg(short, long, value_name = "MS", default_value = "60000")]
    pub wait_ms: u64,
}

impl InterrogateCommand {
    pub async fn execute(&self, settings: &ProbeSettings) -> Result<()> {
        let mut config = settings.interrogator_config()?;
        if let Some(greeting) = &self.greeting {
            config = config.with_greeting(greeting.clone());
        }
        if let Some(label) = &self.encoding {
            config = config.with_encoding(encoding_for_label(label)?);
        }
        if let Some(ms) = self.read_timeout_ms {
            config = config.with_read_timeout_ms(ms);
        }

        let interrogator = Interrogator::new(config)?;
        interrogator
            .interrogate(&self.host, self.port)
            .with_context(|| format!("cannot interrogate {}:{}", self.host, self.port))?;

        if timeout(Duration::from_millis(self.wait_ms), interrogator.wait())
            .await
            .is_err()
        {
            output::print_warning("connection still pending, giving up");
        }

        let target = format!("{}:{}", self.host, self.port);
        output::print_response(&target, interrogator.response().as_deref());
        Ok(())
    }
}
