//! Scanner module - concurrent TCP connect probing.
//!
//! [`TcpScanner`] accepts targets, keeps one session per target key in the
//! [`SessionRegistry`], and publishes each finalized [`ProbeResult`] to the
//! [`ResultStore`] before retiring the session.

pub mod registry;
pub mod result;
pub mod session;
pub mod store;
pub mod tcp;

pub use registry::SessionRegistry;
pub use result::{ProbeResult, ProbeStatus};
pub use session::ProbeSession;
pub use store::ResultStore;
pub use tcp::TcpScanner;
