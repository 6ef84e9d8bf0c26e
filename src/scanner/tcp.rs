//! TCP connect scanner.
//!
//! Each submitted target gets its own task that attempts a full TCP handshake.
//! The caller only pays for validation and registration; the outcome lands in
//! the result store once the attempt resolves.

use crate::config::ScannerConfig;
use crate::error::{EngineResult, ProbeError};
use crate::scanner::registry::SessionRegistry;
use crate::scanner::result::{ProbeResult, ProbeStatus};
use crate::scanner::session::ProbeSession;
use crate::scanner::store::ResultStore;
use crate::types::{Target, TargetKey};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Attempt a TCP connection, optionally bounded by `limit`.
pub(crate) async fn connect(addr: SocketAddr, limit: Option<Duration>) -> EngineResult<TcpStream> {
    match limit {
        Some(limit) => match timeout(limit, TcpStream::connect(addr)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ProbeError::ConnectTimeout(limit)),
        },
        None => Ok(TcpStream::connect(addr).await?),
    }
}

/// State shared between the scanner handle and its probe tasks.
#[derive(Debug, Default)]
struct Shared {
    registry: SessionRegistry,
    store: ResultStore,
    idle: Notify,
}

/// Retires a session when dropped: removes it from the registry and wakes
/// anyone waiting for quiescence. Runs even if the probe task panics or is
/// dropped by a shutting-down runtime.
struct Retire {
    shared: Arc<Shared>,
    key: TargetKey,
}

impl Drop for Retire {
    fn drop(&mut self) {
        self.shared.registry.remove(&self.key);
        self.shared.idle.notify_waiters();
    }
}

/// Asynchronous, thread-safe TCP connect scanner.
///
/// At most one attempt per target key is in flight at a time; submitting a
/// target that is already being probed does nothing. Cloning yields another
/// handle onto the same registry and results.
///
/// # Example
///
/// ```no_run
/// use portprobe::config::ScannerConfig;
/// use portprobe::scanner::TcpScanner;
///
/// # async fn run() -> Result<(), portprobe::ProbeError> {
/// let scanner = TcpScanner::new(ScannerConfig::new())?;
/// scanner.submit("127.0.0.1", 22)?;
/// scanner.submit("127.0.0.1", 80)?;
/// scanner.wait_idle().await;
///
/// for result in scanner.results() {
///     println!("{} {}", result, result.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpScanner {
    runtime: Handle,
    config: ScannerConfig,
    shared: Arc<Shared>,
}

impl TcpScanner {
    /// Create a scanner on the current tokio runtime.
    ///
    /// Fails with [`ProbeError::Runtime`] when called outside one.
    pub fn new(config: ScannerConfig) -> EngineResult<Self> {
        let runtime = Handle::try_current().map_err(|e| ProbeError::Runtime(e.to_string()))?;
        Ok(Self::with_handle(runtime, config))
    }

    /// Create a scanner that spawns its probes on `runtime`.
    pub fn with_handle(runtime: Handle, config: ScannerConfig) -> Self {
        Self {
            runtime,
            config,
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Start probing `host:port`. Returns as soon as the attempt is started.
    ///
    /// Fails with [`ProbeError::InvalidArgument`] for an empty or non-IP host
    /// or a port outside 1-65535, before touching the network.
    pub fn submit(&self, host: &str, port: u32) -> EngineResult<()> {
        let target = Target::parse(host, port)?;
        self.submit_target(target);
        Ok(())
    }

    /// Start probing an already validated target.
    ///
    /// Returns `false` when an attempt for the same key is still in flight;
    /// the request is dropped, not queued.
    pub fn submit_target(&self, target: Target) -> bool {
        let session = ProbeSession::new(target);
        let key = session.key().clone();

        if !self
            .shared
            .registry
            .try_register(key.clone(), session.result().clone())
        {
            debug!(key = %key, "probe already in flight, skipping");
            return false;
        }

        debug!(key = %key, "probe started");
        let retire = Retire {
            shared: Arc::clone(&self.shared),
            key,
        };
        self.runtime
            .spawn(run_probe(session, self.config.connect_timeout, retire));
        true
    }

    /// Whether any attempt is still in flight.
    ///
    /// A snapshot over a concurrently changing registry: it may still report
    /// `true` for a session that is finishing. Poll until it stays `false`, or
    /// use [`wait_idle`](Self::wait_idle).
    pub fn is_processing(&self) -> bool {
        !self.shared.registry.is_empty()
    }

    /// Every result finalized so far, in no particular order.
    pub fn results(&self) -> Vec<ProbeResult> {
        self.shared.store.snapshot()
    }

    /// `connecting` results for the attempts still in flight.
    pub fn in_flight(&self) -> Vec<ProbeResult> {
        self.shared.registry.snapshot()
    }

    /// Resolve once no attempt is in flight.
    ///
    /// Attempts without a connect timeout may never finish; wrap this in
    /// `tokio::time::timeout` to bound the wait.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.shared.registry.is_empty() {
                return;
            }
            notified.await;
        }
    }
}

/// Terminal status for a connect outcome. Every failure kind, timeouts
/// included, is `closed`.
fn classify<T>(outcome: &EngineResult<T>) -> ProbeStatus {
    match outcome {
        Ok(_) => ProbeStatus::Open,
        Err(_) => ProbeStatus::Closed,
    }
}

/// Drive one attempt to completion.
///
/// The result is published before the connection is released, and both happen
/// before `retire` removes the session.
async fn run_probe(mut session: ProbeSession, connect_timeout: Option<Duration>, retire: Retire) {
    let addr = session.target().socket_addr();

    let outcome = connect(addr, connect_timeout).await;
    let status = classify(&outcome);
    match outcome {
        Ok(stream) => session.attach(stream),
        Err(e) => trace!(key = %session.key(), error = %e, "connect failed"),
    }

    if let Some(result) = session.finalize(status) {
        debug!(key = %session.key(), status = %status, "probe finished");
        retire.shared.store.push(result);
    }
    session.release();
    drop(retire);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_new_requires_runtime() {
        assert!(matches!(
            TcpScanner::new(ScannerConfig::new()),
            Err(ProbeError::Runtime(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_arguments_take_no_action() {
        let scanner = TcpScanner::new(ScannerConfig::new()).unwrap();

        assert!(scanner.submit("", 80).is_err());
        assert!(scanner.submit("not-an-ip", 80).is_err());
        assert!(scanner.submit("127.0.0.1", 0).is_err());
        assert!(scanner.submit("127.0.0.1", 70_000).is_err());

        assert!(!scanner.is_processing());
        assert!(scanner.results().is_empty());
    }

    #[tokio::test]
    async fn test_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let scanner = TcpScanner::new(ScannerConfig::new()).unwrap();

        scanner.submit("127.0.0.1", port as u32).unwrap();
        assert!(scanner.is_processing());
        assert_eq!(scanner.in_flight()[0].status, ProbeStatus::Connecting);

        scanner.wait_idle().await;
        let results = scanner.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ProbeStatus::Open);
        assert_eq!(results[0].code(), 0);
    }

    #[tokio::test]
    async fn test_closed_port() {
        let port = closed_port().await;
        let scanner = TcpScanner::new(ScannerConfig::new()).unwrap();

        scanner.submit("127.0.0.1", port as u32).unwrap();
        scanner.wait_idle().await;

        let results = scanner.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label(), "closed");
        assert_eq!(results[0].code(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_dropped() {
        let port = closed_port().await;
        let scanner = TcpScanner::new(ScannerConfig::new()).unwrap();

        scanner.submit("127.0.0.1", port as u32).unwrap();
        scanner.submit("127.0.0.1", port as u32).unwrap();
        assert_eq!(scanner.in_flight().len(), 1);

        scanner.wait_idle().await;
        assert_eq!(scanner.results().len(), 1);
    }

    #[tokio::test]
    async fn test_resubmit_after_completion() {
        let port = closed_port().await;
        let scanner = TcpScanner::new(ScannerConfig::new()).unwrap();

        scanner.submit("127.0.0.1", port as u32).unwrap();
        scanner.wait_idle().await;
        scanner.submit("127.0.0.1", port as u32).unwrap();
        scanner.wait_idle().await;

        assert_eq!(scanner.results().len(), 2);
        assert!(!scanner.is_processing());
    }

    #[test]
    fn test_classify_collapses_failures() {
        assert_eq!(classify(&Ok::<(), ProbeError>(())), ProbeStatus::Open);
        assert_eq!(
            classify(&Err::<(), _>(ProbeError::ConnectTimeout(Duration::from_millis(200)))),
            ProbeStatus::Closed
        );
        for kind in [
            std::io::ErrorKind::ConnectionRefused,
            std::io::ErrorKind::ConnectionReset,
            std::io::ErrorKind::TimedOut,
        ] {
            let err = ProbeError::from(std::io::Error::from(kind));
            assert_eq!(classify(&Err::<(), _>(err)), ProbeStatus::Closed);
        }
    }

    #[tokio::test]
    async fn test_bounded_connect_reports_refusal() {
        let port = closed_port().await;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let outcome = connect(addr, Some(Duration::from_secs(5))).await;
        assert!(matches!(outcome, Err(ProbeError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_connect_timeout_keeps_open_classification() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap().port();
        let closed = closed_port().await;
        let scanner =
            TcpScanner::new(ScannerConfig::new().with_connect_timeout(Duration::from_secs(5)))
                .unwrap();

        scanner.submit("127.0.0.1", open as u32).unwrap();
        scanner.submit("127.0.0.1", closed as u32).unwrap();
        timeout(Duration::from_secs(10), scanner.wait_idle())
            .await
            .unwrap();

        for result in scanner.results() {
            let expected = if result.port.as_u16() == open {
                ProbeStatus::Open
            } else {
                ProbeStatus::Closed
            };
            assert_eq!(result.status, expected);
        }
    }
}
