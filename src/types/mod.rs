//! Core type definitions using newtype patterns for type safety.
//!
//! Validation happens once, when a [`Target`] is built; everything downstream
//! works with values that are already known to be well formed.

mod port;
mod target;

pub use port::{Port, PortError, PortSpec};
pub use target::{Target, TargetKey};
