// this_file: crates/fontres/src/cache.rs

//! Per-display memo of resolved queries
//!
//! Keyed exactly by (display, driver cache, spec, max results). New entries
//! go to the head of the display's list so the most recently queried spec
//! is found first. There is no eviction: the cache lives as long as the
//! display and is flushed wholesale when the font configuration changes.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fontres_core::{DisplayId, FontEntity, FontSpec};
use parking_lot::RwLock;

/// Identifies one resolved query within a display
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub cache: String,
    pub spec: FontSpec,
    pub max_results: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: CacheKey,
    entities: Arc<[Arc<FontEntity>]>,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub struct EntityCache {
    displays: RwLock<HashMap<DisplayId, VecDeque<CacheEntry>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, display: DisplayId, key: &CacheKey) -> Option<Arc<[Arc<FontEntity>]>> {
        let displays = self.displays.read();
        let found = displays
            .get(&display)
            .and_then(|entries| entries.iter().find(|e| &e.key == key))
            .map(|e| e.entities.clone());
        match &found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("entity cache hit for {:?} on {:?}", key.spec, display);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
        }
        found
    }

    /// Stores a result at the head of the display's list
    pub fn insert(
        &self,
        display: DisplayId,
        key: CacheKey,
        entities: Vec<Arc<FontEntity>>,
    ) -> Arc<[Arc<FontEntity>]> {
        let entities: Arc<[Arc<FontEntity>]> = entities.into();
        let mut displays = self.displays.write();
        let list = displays.entry(display).or_default();
        list.retain(|e| e.key != key);
        list.push_front(CacheEntry {
            key,
            entities: entities.clone(),
        });
        entities
    }

    /// Drops every entry of `display`, returning the entities they held
    pub fn flush(&self, display: DisplayId) -> Vec<Arc<FontEntity>> {
        let removed = self.displays.write().remove(&display);
        removed.map(collect_entities).unwrap_or_default()
    }

    pub fn flush_all(&self) -> Vec<Arc<FontEntity>> {
        let removed = std::mem::take(&mut *self.displays.write());
        removed.into_values().flat_map(collect_entities).collect()
    }

    /// Keys of `display` in lookup order, most recent first
    pub fn keys(&self, display: DisplayId) -> Vec<CacheKey> {
        self.displays
            .read()
            .get(&display)
            .map(|entries| entries.iter().map(|e| e.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.displays.read().values().map(VecDeque::len).sum(),
        }
    }
}

fn collect_entities(entries: VecDeque<CacheEntry>) -> Vec<Arc<FontEntity>> {
    entries
        .into_iter()
        .flat_map(|e| e.entities.iter().cloned().collect::<Vec<_>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(family: &str, max: usize) -> CacheKey {
        CacheKey {
            cache: "mock".into(),
            spec: FontSpec::family(family),
            max_results: max,
        }
    }

    fn entity(family: &str) -> Arc<FontEntity> {
        Arc::new(FontEntity::builder("mock", family).build())
    }

    #[test]
    fn miss_then_hit() {
        let cache = EntityCache::new();
        let display = DisplayId(0);
        assert!(cache.get(display, &key("A", 0)).is_none());
        cache.insert(display, key("A", 0), vec![entity("A")]);
        let hit = cache.get(display, &key("A", 0)).expect("cached");
        assert_eq!(hit.len(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn key_match_is_exact() {
        let cache = EntityCache::new();
        let display = DisplayId(0);
        cache.insert(display, key("A", 0), vec![entity("A")]);
        assert!(cache.get(display, &key("A", 1)).is_none());
        assert!(cache.get(display, &key("a", 0)).is_none());
        assert!(cache.get(DisplayId(1), &key("A", 0)).is_none());
    }

    #[test]
    fn newest_entries_come_first() {
        let cache = EntityCache::new();
        let display = DisplayId(0);
        cache.insert(display, key("A", 0), Vec::new());
        cache.insert(display, key("B", 0), Vec::new());
        let families: Vec<_> = cache
            .keys(display)
            .into_iter()
            .filter_map(|k| k.spec.family)
            .collect();
        assert_eq!(families, vec!["B", "A"]);
    }

    #[test]
    fn flush_is_per_display() {
        let cache = EntityCache::new();
        cache.insert(DisplayId(0), key("A", 0), vec![entity("A"), entity("A")]);
        cache.insert(DisplayId(1), key("B", 0), vec![entity("B")]);
        assert_eq!(cache.flush(DisplayId(0)).len(), 2);
        assert!(cache.get(DisplayId(0), &key("A", 0)).is_none());
        assert!(cache.get(DisplayId(1), &key("B", 0)).is_some());
        assert_eq!(cache.flush_all().len(), 1);
        assert_eq!(cache.stats().entries, 0);
    }
}
