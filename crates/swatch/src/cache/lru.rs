//! A bounded least-recently-used cache.
//!
//! Entries live in an arena (`Vec` of slots) linked into a recency list by
//! index; a `HashMap` maps keys to slots. Lookups through [`LruCache::get`]
//! and [`LruCache::has`] promote the entry to most recently used; inserting
//! past capacity evicts the least recently used entry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

/// Capacity used by [`LruCache::default`].
pub const DEFAULT_MAX_SIZE: usize = 1000;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A fixed-capacity cache evicting the least recently used entry.
///
/// ```rust
/// use swatch::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get("a");
/// cache.set("c", 3);
///
/// assert!(cache.has("a"));
/// assert!(!cache.has("b"));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    /// Most recently used.
    head: Option<usize>,
    /// Least recently used.
    tail: Option<usize>,
    max_size: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    pub fn new(max_size: usize) -> Self {
        LruCache {
            map: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `true` if `key` is cached. Promotes the entry.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the cached value and promotes the entry.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = *self.map.get(key)?;
        self.promote(index);
        self.slots[index].as_ref().map(|node| &node.value)
    }

    /// Returns the cached value without changing recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = *self.map.get(key)?;
        self.slots[index].as_ref().map(|node| &node.value)
    }

    /// Inserts or replaces `key` as the most recently used entry, evicting
    /// the least recently used entry when over capacity.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(&index) = self.map.get(&key) {
            if let Some(node) = self.slots[index].as_mut() {
                node.value = value;
            }
            self.promote(index);
            return;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.map.insert(key, index);
        self.push_front(index);

        if self.map.len() > self.max_size {
            self.evict();
        }
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut cursor = self.head;
        while let Some(index) = cursor {
            match self.slots[index].as_ref() {
                Some(node) => {
                    keys.push(&node.key);
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    fn evict(&mut self) {
        let Some(index) = self.tail else {
            return;
        };
        self.unlink(index);
        if let Some(node) = self.slots[index].take() {
            self.map.remove(&node.key);
            debug!("lru: evicted entry at slot {} (max size {})", index, self.max_size);
        }
        self.free.push(index);
    }

    fn promote(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.unlink(index);
        self.push_front(index);
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = match self.slots[index].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.slots[index].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[index].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(node) = self.slots[h].as_mut() {
                node.prev = Some(index);
            }
        }
        self.head = Some(index);
        if self.tail.is_none() {
            self.tail = Some(index);
        }
    }
}

impl<K: Hash + Eq + Clone, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}
