//! Caches: a generic LRU, the per-theme resolution memo and the composition
//! cache for component sheet lists.

pub mod composition;
pub mod lru;
pub mod memo;

pub use composition::{global_cache, StyleSheetCache};
pub use lru::LruCache;
pub use memo::ResolutionCache;
