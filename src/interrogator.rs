//! Single-target service interrogation (banner grabbing).
//!
//! Connects to one target, optionally sends a greeting, and captures whatever
//! the peer sends back in a single bounded read.

use crate::config::InterrogatorConfig;
use crate::error::{EngineResult, ProbeError};
use crate::scanner::tcp::connect;
use crate::scanner::{ProbeResult, ProbeStatus};
use crate::types::Target;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::debug;

/// Maximum bytes captured from a response.
pub const MAX_RESPONSE_SIZE: usize = 1024;

/// Encode `text` with `encoding`.
///
/// `encoding_rs` only decodes UTF-16, so both byte orders are produced here.
pub fn encode_text<'a>(encoding: &'static Encoding, text: &'a str) -> Cow<'a, [u8]> {
    if encoding == UTF_16LE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
    } else if encoding == UTF_16BE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
    } else {
        encoding.encode(text).0
    }
}

#[derive(Debug, Default)]
struct State {
    processing: AtomicBool,
    result: Mutex<Option<ProbeResult>>,
    done: Notify,
}

impl State {
    fn set_result(&self, result: Option<ProbeResult>) {
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = result;
    }

    fn result(&self) -> Option<ProbeResult> {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Clears the processing flag when dropped, whichever way the task exits.
struct ProcessingGuard(Arc<State>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.processing.store(false, Ordering::Release);
        self.0.done.notify_waiters();
    }
}

/// Connects to a single target and records its response.
///
/// An instance holds one result and one processing flag. Calling
/// [`interrogate`](Self::interrogate) again while a previous call is still
/// processing races on that state; use one instance per outstanding call.
#[derive(Debug)]
pub struct Interrogator {
    runtime: Handle,
    config: InterrogatorConfig,
    state: Arc<State>,
}

impl Interrogator {
    /// Create an interrogator on the current tokio runtime.
    pub fn new(config: InterrogatorConfig) -> EngineResult<Self> {
        let runtime = Handle::try_current().map_err(|e| ProbeError::Runtime(e.to_string()))?;
        Ok(Self::with_handle(runtime, config))
    }

    pub fn with_handle(runtime: Handle, config: InterrogatorConfig) -> Self {
        Self {
            runtime,
            config,
            state: Arc::new(State::default()),
        }
    }

    pub fn config(&self) -> &InterrogatorConfig {
        &self.config
    }

    /// Start interrogating `host:port`. Returns as soon as the connect is started.
    ///
    /// Argument errors are returned before any network action. Connection and
    /// read failures are never returned; they just leave no response.
    pub fn interrogate(&self, host: &str, port: u32) -> EngineResult<()> {
        let target = Target::parse(host, port)?;

        self.state.processing.store(true, Ordering::Release);
        self.state.set_result(None);
        let guard = ProcessingGuard(Arc::clone(&self.state));

        debug!(target = %target, "interrogation started");
        self.runtime
            .spawn(run_interrogation(target, self.config.clone(), guard));
        Ok(())
    }

    pub fn is_processing(&self) -> bool {
        self.state.processing.load(Ordering::Acquire)
    }

    /// The decoded response from the last completed interrogation, if any.
    pub fn response(&self) -> Option<String> {
        self.state.result().and_then(|r| r.response)
    }

    /// The finalized result of the last completed interrogation.
    ///
    /// `open` whenever the connection succeeded, even if nothing was read.
    pub fn result(&self) -> Option<ProbeResult> {
        self.state.result()
    }

    /// Resolve once the current interrogation has finished.
    pub async fn wait(&self) {
        loop {
            let notified = self.state.done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.is_processing() {
                return;
            }
            notified.await;
        }
    }
}

async fn run_interrogation(target: Target, config: InterrogatorConfig, guard: ProcessingGuard) {
    let pending = ProbeResult::connecting(&target);

    let result = match connect(target.socket_addr(), config.connect_timeout).await {
        Ok(stream) => {
            let response = match exchange(stream, &config).await {
                Ok(text) => {
                    debug!(target = %target, bytes = text.len(), "response captured");
                    Some(text)
                }
                Err(e) => {
                    debug!(target = %target, error = %e, "no response");
                    None
                }
            };
            pending.finalized(ProbeStatus::Open).with_response(response)
        }
        Err(e) => {
            debug!(target = %target, error = %e, "connect failed");
            pending.finalized(ProbeStatus::Closed)
        }
    };

    guard.0.set_result(Some(result));
    drop(guard);
}

/// Send the greeting and read once.
///
/// The read timeout applies to the read only. The stream is closed when this
/// returns, on every path.
async fn exchange(mut stream: TcpStream, config: &InterrogatorConfig) -> EngineResult<String> {
    if let Some(greeting) = config.greeting.as_deref() {
        let hello = encode_text(config.encoding, greeting);
        stream.write_all(&hello).await?;
    }

    let limit = config.read_timeout.as_duration();
    let mut buffer = [0u8; MAX_RESPONSE_SIZE];
    let read = timeout(limit, stream.read(&mut buffer))
        .await
        .map_err(|_| ProbeError::ReadTimeout(limit))??;

    let (text, _) = config
        .encoding
        .decode_without_bom_handling(&buffer[..read]);
    Ok(text.into_owned())
}
