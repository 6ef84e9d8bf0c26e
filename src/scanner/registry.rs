//! Session registry.
//!
//! Tracks which targets have an attempt in flight. At most one entry exists per
//! [`TargetKey`]; a second registration for a live key is refused.

use crate::scanner::result::ProbeResult;
use crate::types::TargetKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

/// Thread-safe map from target key to the in-flight result snapshot.
///
/// Callers never lock anything themselves; every operation is atomic on its
/// own.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<TargetKey, ProbeResult>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `pending` under `key` unless the key is already live.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn try_register(&self, key: TargetKey, pending: ProbeResult) -> bool {
        match self.sessions.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                trace!(key = %slot.key(), "session registered");
                slot.insert(pending);
                true
            }
        }
    }

    /// Retire the session for `key`.
    pub fn remove(&self, key: &TargetKey) -> Option<ProbeResult> {
        let removed = self.sessions.remove(key).map(|(_, pending)| pending);
        if removed.is_some() {
            trace!(key = %key, "session retired");
        }
        removed
    }

    pub fn contains(&self, key: &TargetKey) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Point-in-time check; may lag sessions that are finishing concurrently.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Copy of every in-flight result.
    pub fn snapshot(&self) -> Vec<ProbeResult> {
        self.sessions.iter().map(|e| e.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;
    use std::sync::Arc;

    fn pending(host: &str, port: u32) -> (TargetKey, ProbeResult) {
        let target = Target::parse(host, port).unwrap();
        (target.key(), ProbeResult::connecting(&target))
    }

    #[test]
    fn test_register_is_exclusive() {
        let registry = SessionRegistry::new();
        let (key, result) = pending("10.0.0.1", 80);

        assert!(registry.try_register(key.clone(), result.clone()));
        assert!(!registry.try_register(key.clone(), result));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&key));
    }

    #[test]
    fn test_remove_frees_key() {
        let registry = SessionRegistry::new();
        let (key, result) = pending("10.0.0.1", 80);

        registry.try_register(key.clone(), result.clone());
        assert!(registry.remove(&key).is_some());
        assert!(registry.is_empty());
        assert!(registry.remove(&key).is_none());
        assert!(registry.try_register(key, result));
    }

    #[test]
    fn test_concurrent_registration_admits_one() {
        let registry = Arc::new(SessionRegistry::new());
        let (key, result) = pending("10.0.0.1", 443);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let key = key.clone();
                let result = result.clone();
                std::thread::spawn(move || registry.try_register(key, result))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&inserted| inserted)
            .count();
        assert_eq!(admitted, 1);
        assert_eq!(registry.snapshot().len(), 1);
    }
}
