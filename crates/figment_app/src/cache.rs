//! Parsed drawable cache
//!
//! Parsing image bytes is the expensive part of drawing a frame, so parsed
//! drawables are kept in an LRU keyed by layer identity plus content hash.

use std::num::NonZeroUsize;
use std::sync::Arc;

use figment_core::{Layer, LayerId};
use figment_image::{Drawable, ParseOptions};
use lru::LruCache;

/// Identity of a parsed drawable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub layer: LayerId,
    pub content_hash: u64,
}

impl CacheKey {
    pub fn of(layer: &Layer) -> Self {
        Self {
            layer: layer.id(),
            content_hash: layer.content_hash(),
        }
    }
}

/// Hit/miss counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct DrawableCache {
    entries: LruCache<CacheKey, Arc<Drawable>>,
    options: ParseOptions,
    stats: CacheStats,
}

impl DrawableCache {
    pub fn new(capacity: usize, options: ParseOptions) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            options,
            stats: CacheStats::default(),
        }
    }

    /// The drawable for a layer, parsing its bytes on a miss
    pub fn get_or_parse(&mut self, layer: &Layer) -> Arc<Drawable> {
        let key = CacheKey::of(layer);
        if let Some(drawable) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Arc::clone(drawable);
        }

        self.stats.misses += 1;
        let drawable = Arc::new(Drawable::parse(layer.data(), self.options));
        if drawable.is_none() {
            tracing::debug!(layer = %layer.id(), name = layer.name(), "layer has nothing to draw");
        }
        self.entries.put(key, Arc::clone(&drawable));
        drawable
    }

    /// Seed the cache with a drawable decoded elsewhere
    pub fn prime(&mut self, layer: &Layer, drawable: Drawable) {
        self.entries.put(CacheKey::of(layer), Arc::new(drawable));
    }

    pub fn contains(&self, layer: &Layer) -> bool {
        self.entries.contains(&CacheKey::of(layer))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl std::fmt::Debug for DrawableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.cap())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"/>"#;

    #[test]
    fn test_second_lookup_hits() {
        let mut cache = DrawableCache::new(4, ParseOptions::default());
        let layer = Layer::new(LayerId(1), SVG.to_vec(), "a");

        let first = cache.get_or_parse(&layer);
        let second = cache.get_or_parse(&layer);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = DrawableCache::new(2, ParseOptions::default());
        let layers: Vec<Layer> = (1..=3)
            .map(|id| Layer::new(LayerId(id), vec![id as u8], "x"))
            .collect();

        cache.get_or_parse(&layers[0]);
        cache.get_or_parse(&layers[1]);
        cache.get_or_parse(&layers[0]);
        cache.get_or_parse(&layers[2]);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&layers[0]));
        assert!(!cache.contains(&layers[1]));
    }

    #[test]
    fn test_zero_capacity_still_caches_one() {
        let mut cache = DrawableCache::new(0, ParseOptions::default());
        let layer = Layer::new(LayerId(1), SVG.to_vec(), "a");
        cache.get_or_parse(&layer);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prime_skips_parsing() {
        let mut cache = DrawableCache::new(2, ParseOptions::default());
        let layer = Layer::new(LayerId(1), vec![0xff], "a");
        cache.prime(&layer, Drawable::None);
        assert!(cache.get_or_parse(&layer).is_none());
        assert_eq!(cache.stats().misses, 0);
    }
}
