//! Duplicate filtering of decoded payloads.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of payload strings already seen this session.
///
/// Shared between the capture thread (`try_add`) and the presentation context
/// (`clear`), so the lock lives inside the type rather than around it.
/// Membership grows monotonically until an explicit `clear`.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: Mutex<HashSet<String>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a payload if it has not been seen yet.
    ///
    /// Returns `true` if the payload was absent and is now recorded,
    /// `false` if it was already present. Atomic with respect to
    /// concurrent callers.
    pub fn try_add(&self, payload: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(payload) {
            false
        } else {
            seen.insert(payload.to_string());
            true
        }
    }

    /// Check whether a payload has been seen.
    pub fn contains(&self, payload: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(payload)
    }

    /// Empty the set. Visible to subsequent `try_add` calls immediately.
    pub fn clear(&self) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of distinct payloads seen.
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_try_add_twice() {
        let registry = DedupRegistry::new();
        assert!(registry.try_add("HELLO"));
        assert!(!registry.try_add("HELLO"));
    }

    #[test]
    fn test_distinct_payloads() {
        let registry = DedupRegistry::new();
        assert!(registry.try_add("a"));
        assert!(registry.try_add("b"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clear_resets_membership() {
        let registry = DedupRegistry::new();
        assert!(registry.try_add("HELLO"));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.try_add("HELLO"));
    }

    #[test]
    fn test_contains() {
        let registry = DedupRegistry::new();
        assert!(!registry.contains("x"));
        registry.try_add("x");
        assert!(registry.contains("x"));
    }

    #[test]
    fn test_concurrent_try_add_single_winner() {
        let registry = Arc::new(DedupRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || registry.try_add("RACE")));
        }
        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
        assert_eq!(registry.len(), 1);
    }
}
