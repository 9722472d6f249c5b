//! Cache of assembled style sheet lists for components.
//!
//! A styled component combines up to four inputs: its face sheet, the list of
//! sheets inherited from parents, an optional per-use override sheet and its
//! own local sheet. Assembling the list is cheap, but returning the *same*
//! list for the same inputs lets downstream resolution caches hit. Entries
//! are keyed by input identity and kept in a bounded LRU, so unused
//! combinations age out.

use std::sync::{Mutex, PoisonError};

use log::trace;
use once_cell::sync::Lazy;

use super::lru::LruCache;
use crate::value::{SheetId, SheetList, StyleSheet};

/// Capacity of each table in [`StyleSheetCache::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

type PlainKey = (SheetId, SheetId, SheetId);
type OverrideKey = (SheetId, SheetId, SheetId, SheetId);

/// Identity-keyed cache of assembled sheet lists.
///
/// The assembled order is `[local, face, ...parents]`, with the override
/// sheet appended last for the override variant.
///
/// ```rust
/// use swatch::{SheetList, StyleSheet, StyleSheetCache};
///
/// let cache = StyleSheetCache::new();
/// let face = StyleSheet::new();
/// let parents = SheetList::default();
/// let local = StyleSheet::new();
///
/// assert!(cache.get(&face, &parents, &local).is_none());
/// let list = cache.set(&face, &parents, &local);
/// assert!(cache.get(&face, &parents, &local).unwrap().same(&list));
/// ```
#[derive(Debug)]
pub struct StyleSheetCache {
    plain: Mutex<LruCache<PlainKey, SheetList>>,
    by_override: Mutex<LruCache<OverrideKey, SheetList>>,
}

impl StyleSheetCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a cache holding up to `capacity` lists per table.
    pub fn with_capacity(capacity: usize) -> Self {
        StyleSheetCache {
            plain: Mutex::new(LruCache::new(capacity)),
            by_override: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, face: &StyleSheet, parents: &SheetList, local: &StyleSheet) -> Option<SheetList> {
        let key = (face.id(), parents.id(), local.id());
        let mut table = self.plain.lock().unwrap_or_else(PoisonError::into_inner);
        let hit = table.get(&key).cloned();
        if hit.is_some() {
            trace!("composition cache hit for local sheet {:?}", local.id());
        }
        hit
    }

    /// Returns the cached list for these inputs, assembling it on first use.
    pub fn set(&self, face: &StyleSheet, parents: &SheetList, local: &StyleSheet) -> SheetList {
        let key = (face.id(), parents.id(), local.id());
        let mut table = self.plain.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(&key) {
            return existing.clone();
        }
        let list = assemble(face, parents, None, local);
        table.set(key, list.clone());
        list
    }

    pub fn get_by_override(
        &self,
        face: &StyleSheet,
        parents: &SheetList,
        style_override: &StyleSheet,
        local: &StyleSheet,
    ) -> Option<SheetList> {
        let key = (face.id(), parents.id(), style_override.id(), local.id());
        let mut table = self.by_override.lock().unwrap_or_else(PoisonError::into_inner);
        table.get(&key).cloned()
    }

    /// Like [`set`](Self::set), with `style_override` appended last.
    pub fn set_by_override(
        &self,
        face: &StyleSheet,
        parents: &SheetList,
        style_override: &StyleSheet,
        local: &StyleSheet,
    ) -> SheetList {
        let key = (face.id(), parents.id(), style_override.id(), local.id());
        let mut table = self.by_override.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(&key) {
            return existing.clone();
        }
        let list = assemble(face, parents, Some(style_override), local);
        table.set(key, list.clone());
        list
    }

    /// Number of cached lists across both tables.
    pub fn len(&self) -> usize {
        let plain = self.plain.lock().unwrap_or_else(PoisonError::into_inner).size();
        let by_override = self
            .by_override
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .size();
        plain + by_override
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.plain.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.by_override
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for StyleSheetCache {
    fn default() -> Self {
        Self::new()
    }
}

fn assemble(
    face: &StyleSheet,
    parents: &SheetList,
    style_override: Option<&StyleSheet>,
    local: &StyleSheet,
) -> SheetList {
    let mut sheets = Vec::with_capacity(parents.len() + 3);
    sheets.push(local.clone());
    sheets.push(face.clone());
    sheets.extend(parents.iter().cloned());
    sheets.extend(style_override.cloned());
    SheetList::new(sheets)
}

static GLOBAL: Lazy<StyleSheetCache> = Lazy::new(StyleSheetCache::new);

/// The process-wide composition cache.
pub fn global_cache() -> &'static StyleSheetCache {
    &GLOBAL
}
