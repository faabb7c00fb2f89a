//! Bounded palette cache with least-recently-used eviction.

use super::{Palette, PaletteError};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// `root_count` is only part of the key for the `newton` palette.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaletteKey {
    pub name: String,
    pub steps: usize,
    pub root_count: Option<usize>,
}

impl PaletteKey {
    pub fn new(name: &str, steps: usize, root_count: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            steps,
            root_count: if name == "newton" { root_count } else { None },
        }
    }
}

#[derive(Debug)]
pub struct PaletteCache {
    entries: LruCache<PaletteKey, Arc<Palette>>,
    hits: u64,
    misses: u64,
}

impl Default for PaletteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PaletteCache {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached palette for the key, generating it on a miss.
    pub fn get(
        &mut self,
        name: &str,
        steps: usize,
        root_count: Option<usize>,
    ) -> Result<Arc<Palette>, PaletteError> {
        let key = PaletteKey::new(name, steps, root_count);
        if let Some(palette) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(palette));
        }

        self.misses += 1;
        let palette = Arc::new(Palette::generate(name, steps, root_count)?);
        if let Some((old, _)) = self.entries.push(key, Arc::clone(&palette)) {
            log::trace!("evicting palette {} ({} steps)", old.name, old.steps);
        }
        Ok(palette)
    }

    /// Presence check that does not count as a use.
    pub fn contains(&self, name: &str, steps: usize, root_count: Option<usize>) -> bool {
        self.entries
            .contains(&PaletteKey::new(name, steps, root_count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// `(hits, misses)` since creation or the last clear.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
