//! In-flight probe state.

use crate::scanner::result::{ProbeResult, ProbeStatus};
use crate::types::{Target, TargetKey};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::trace;

/// Mutable state for one active connection attempt.
///
/// Owned by the task driving the attempt. The connection handle lives only as
/// long as the session and is released on every exit path, since dropping the
/// session drops the stream.
#[derive(Debug)]
pub struct ProbeSession {
    key: TargetKey,
    target: Target,
    stream: Option<TcpStream>,
    result: ProbeResult,
    finalized: bool,
    started: Instant,
}

impl ProbeSession {
    pub fn new(target: Target) -> Self {
        Self {
            key: target.key(),
            result: ProbeResult::connecting(&target),
            target,
            stream: None,
            finalized: false,
            started: Instant::now(),
        }
    }

    pub fn key(&self) -> &TargetKey {
        &self.key
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The current result; `connecting` until [`finalize`](Self::finalize) runs.
    pub fn result(&self) -> &ProbeResult {
        &self.result
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Hand the established connection to the session.
    pub fn attach(&mut self, stream: TcpStream) {
        self.stream = Some(stream);
    }

    /// Move the result to its terminal state.
    ///
    /// The new value replaces the old one in a single assignment. Returns the
    /// finalized copy, or `None` if the session was already finalized.
    pub fn finalize(&mut self, status: ProbeStatus) -> Option<ProbeResult> {
        if self.finalized || !status.is_terminal() {
            return None;
        }
        self.result = self.result.finalized(status);
        self.finalized = true;
        trace!(key = %self.key, status = %status, elapsed = ?self.elapsed(), "session finalized");
        Some(self.result.clone())
    }

    /// Close the connection handle, if one is attached.
    pub fn release(&mut self) {
        if self.stream.take().is_some() {
            trace!(key = %self.key, "connection released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ProbeSession {
        ProbeSession::new(Target::parse("127.0.0.1", 8080).unwrap())
    }

    #[test]
    fn test_new_session_is_connecting() {
        let s = session();
        assert_eq!(s.key().as_str(), "127.0.0.1-08080");
        assert_eq!(s.result().status, ProbeStatus::Connecting);
        assert_eq!(s.result().code(), 99);
        assert!(!s.is_finalized());
    }

    #[test]
    fn test_finalize_only_once() {
        let mut s = session();
        let first = s.finalize(ProbeStatus::Closed).unwrap();
        assert_eq!(first.code(), 1);
        assert!(s.is_finalized());

        assert!(s.finalize(ProbeStatus::Open).is_none());
        assert_eq!(s.result().status, ProbeStatus::Closed);
    }

    #[test]
    fn test_finalize_rejects_connecting() {
        let mut s = session();
        assert!(s.finalize(ProbeStatus::Connecting).is_none());
        assert!(!s.is_finalized());
    }

    #[tokio::test]
    async fn test_release_closes_connection() {
        use tokio::io::AsyncReadExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut peer, _) = listener.accept().await.unwrap();

        let mut s = ProbeSession::new(Target::parse("127.0.0.1", addr.port() as u32).unwrap());
        s.attach(stream);
        s.release();

        let mut buf = [0u8; 1];
        assert_eq!(peer.read(&mut buf).await.unwrap(), 0);
    }
}
