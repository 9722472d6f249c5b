//! Per-theme memo of resolved style sheets.
//!
//! Resolved sheets are memoized per breakpoint and keyed by the identity of
//! the source sheet. The memo holds only a weak reference to the source;
//! entries whose source has been dropped are pruned lazily once the table
//! grows past its prune threshold.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::value::{SheetId, StyleSheet, WeakSheet};

const INITIAL_PRUNE_THRESHOLD: usize = 256;

#[derive(Debug)]
struct Memo {
    source: WeakSheet,
    resolved: StyleSheet,
}

#[derive(Debug)]
struct Table {
    entries: HashMap<(usize, SheetId), Memo>,
    prune_at: usize,
}

/// Memo of resolved sheets, keyed by breakpoint and source identity.
#[derive(Debug)]
pub struct ResolutionCache {
    table: Mutex<Table>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        ResolutionCache {
            table: Mutex::new(Table {
                entries: HashMap::new(),
                prune_at: INITIAL_PRUNE_THRESHOLD,
            }),
        }
    }

    /// The memoized resolution of `source` at `breakpoint`.
    pub fn get(&self, breakpoint: usize, source: &StyleSheet) -> Option<StyleSheet> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entries
            .get(&(breakpoint, source.id()))
            .map(|memo| memo.resolved.clone())
    }

    pub fn insert(&self, breakpoint: usize, source: &StyleSheet, resolved: StyleSheet) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.entries.insert(
            (breakpoint, source.id()),
            Memo {
                source: source.downgrade(),
                resolved,
            },
        );
        if table.entries.len() >= table.prune_at {
            let before = table.entries.len();
            table.entries.retain(|_, memo| memo.source.is_alive());
            let after = table.entries.len();
            table.prune_at = (after * 2).max(INITIAL_PRUNE_THRESHOLD);
            debug!("resolution memo pruned {} dead entries, {} remain", before - after, after);
        }
    }

    /// Number of memoized entries, including not yet pruned dead ones.
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose source sheet no longer exists.
    pub fn prune(&self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.entries.retain(|_, memo| memo.source.is_alive());
    }

    pub fn clear(&self) {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clear();
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_by_breakpoint_and_identity() {
        let memo = ResolutionCache::new();
        let source = StyleSheet::new().with("m", 1);
        let resolved = StyleSheet::new().with("margin", "4px");
        memo.insert(0, &source, resolved.clone());

        assert!(memo.get(0, &source).unwrap().same(&resolved));
        assert!(memo.get(1, &source).is_none());
        assert!(memo.get(0, &StyleSheet::new().with("m", 1)).is_none());
    }

    #[test]
    fn prunes_dropped_sources() {
        let memo = ResolutionCache::new();
        let kept = StyleSheet::new();
        memo.insert(0, &kept, StyleSheet::new());
        {
            let dropped = StyleSheet::new();
            memo.insert(0, &dropped, StyleSheet::new());
        }
        assert_eq!(memo.len(), 2);
        memo.prune();
        assert_eq!(memo.len(), 1);
        assert!(memo.get(0, &kept).is_some());
    }

    #[test]
    fn prunes_automatically_past_threshold() {
        let memo = ResolutionCache::new();
        for _ in 0..INITIAL_PRUNE_THRESHOLD * 2 {
            let transient = StyleSheet::new();
            memo.insert(0, &transient, StyleSheet::new());
        }
        assert!(memo.len() < INITIAL_PRUNE_THRESHOLD);
    }
}
