//! Resource Cache - memoizes gradients and resolved colors
//!
//! Prevents rebuilding identical drawing resources every frame. Bounded two
//! ways: a capacity limit that drops the earliest-inserted entry, and an age
//! limit enforced by [`ResourceCache::sweep`].
//!
//! Eviction follows insertion order, not recency. Hits refresh an entry's
//! `last_used_ms`, which only matters to the age sweep.

use crate::color::{Color, HslaSpec};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// Configuration for [`ResourceCache`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
    /// Entries unused for longer than this are dropped by a sweep
    pub max_age_ms: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            max_age_ms: 5000.0,
        }
    }
}

/// A cached drawing resource
#[derive(Debug, Clone)]
enum CachedResource<G> {
    Gradient(G),
    Color(Color),
}

#[derive(Debug)]
struct CacheEntry<G> {
    resource: CachedResource<G>,
    last_used_ms: f64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that constructed a resource
    pub misses: u64,
    /// Entries dropped to stay under capacity
    pub evictions: u64,
    /// Entries dropped by age sweeps
    pub expired: u64,
}

/// Keyed cache of gradients (`G`) and colors
pub struct ResourceCache<G> {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry<G>>,
    /// Keys in insertion order, oldest first
    insertion_order: VecDeque<String>,
    /// Timestamp stamped on entries touched this frame
    now_ms: f64,
    stats: CacheStats,
}

impl<G: Clone> ResourceCache<G> {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::with_capacity(config.capacity),
            insertion_order: VecDeque::with_capacity(config.capacity),
            now_ms: 0.0,
            stats: CacheStats::default(),
        }
    }

    /// Set the timestamp used for entries touched until the next call
    pub fn begin_frame(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Return the gradient stored under `key`, building it with `factory` on a miss
    ///
    /// The factory runs at most once per miss; a hit never calls it.
    pub fn get_or_create<F>(&mut self, key: &str, factory: F) -> G
    where
        F: FnOnce() -> G,
    {
        if let Some(entry) = self.entries.get_mut(key) {
            if let CachedResource::Gradient(gradient) = &entry.resource {
                entry.last_used_ms = self.now_ms;
                self.stats.hits += 1;
                return gradient.clone();
            }
        }

        self.stats.misses += 1;
        let gradient = factory();
        self.insert(key, CachedResource::Gradient(gradient.clone()));
        gradient
    }

    /// Resolved color for hue (degrees), saturation and lightness (percent) and alpha
    pub fn get_or_create_color(
        &mut self,
        hue: f32,
        saturation: f32,
        lightness: f32,
        alpha: f32,
    ) -> Color {
        self.color(&HslaSpec::new(hue, saturation, lightness, alpha))
    }

    /// Resolved color for an already-quantized request
    pub fn color(&mut self, spec: &HslaSpec) -> Color {
        let key = spec.cache_key();
        if let Some(entry) = self.entries.get_mut(&key) {
            if let CachedResource::Color(color) = entry.resource {
                entry.last_used_ms = self.now_ms;
                self.stats.hits += 1;
                return color;
            }
        }

        self.stats.misses += 1;
        let color = spec.resolve();
        self.insert(&key, CachedResource::Color(color));
        color
    }

    /// Drop every entry unused for longer than the configured age; returns how many went
    pub fn sweep(&mut self, now_ms: f64) -> usize {
        let max_age = self.config.max_age_ms;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now_ms - entry.last_used_ms <= max_age);
        let removed = before - self.entries.len();

        if removed > 0 {
            let entries = &self.entries;
            self.insertion_order.retain(|key| entries.contains_key(key));
            self.stats.expired += removed as u64;
            debug!(
                "ResourceCache sweep: removed {} stale entries, {} remain",
                removed,
                self.entries.len()
            );
        } else {
            trace!("ResourceCache sweep: nothing stale");
        }
        removed
    }

    /// Restamp every entry as used at `now_ms`
    ///
    /// Used when the host clock restarts, so old stamps from the previous
    /// clock neither outlive the sweep nor expire early.
    pub fn rebase(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        for entry in self.entries.values_mut() {
            entry.last_used_ms = now_ms;
        }
        debug!("ResourceCache rebased {} entries to {:.1}ms", self.entries.len(), now_ms);
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is currently cached
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Counters since creation
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn insert(&mut self, key: &str, resource: CachedResource<G>) {
        // Same key, different kind: replace in place and keep its age slot
        if let Some(entry) = self.entries.get_mut(key) {
            entry.resource = resource;
            entry.last_used_ms = self.now_ms;
            return;
        }

        while self.entries.len() >= self.config.capacity.max(1) {
            if !self.evict_oldest() {
                break;
            }
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                resource,
                last_used_ms: self.now_ms,
            },
        );
        self.insertion_order.push_back(key.to_string());
    }

    fn evict_oldest(&mut self) -> bool {
        while let Some(oldest) = self.insertion_order.pop_front() {
            if self.entries.remove(&oldest).is_some() {
                self.stats.evictions += 1;
                trace!("ResourceCache evicted {}", oldest);
                return true;
            }
        }
        false
    }
}

impl<G: Clone> Default for ResourceCache<G> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_factory_runs_once_per_key() {
        let mut cache: ResourceCache<Rc<u32>> = ResourceCache::default();
        let calls = Cell::new(0);
        let make = || {
            calls.set(calls.get() + 1);
            Rc::new(7)
        };

        let first = cache.get_or_create("grad-a", make);
        let second = cache.get_or_create("grad-a", || {
            calls.set(calls.get() + 1);
            Rc::new(8)
        });

        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_capacity_evicts_earliest_inserted() {
        let mut cache: ResourceCache<usize> = ResourceCache::default();
        for i in 0..100 {
            cache.get_or_create(&format!("k{}", i), || i);
        }
        assert_eq!(cache.len(), 100);

        // Touching the oldest entry does not protect it
        cache.begin_frame(10.0);
        cache.get_or_create("k0", || unreachable!());

        cache.get_or_create("k100", || 100);
        assert_eq!(cache.len(), 100);
        assert!(!cache.contains("k0"));
        assert!(cache.contains("k1"));
        assert!(cache.contains("k100"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_sweep_drops_idle_entries() {
        let mut cache: ResourceCache<u8> = ResourceCache::default();
        cache.begin_frame(0.0);
        cache.get_or_create("old", || 1);
        cache.get_or_create("kept", || 2);

        cache.begin_frame(4000.0);
        cache.get_or_create("kept", || unreachable!());

        assert_eq!(cache.sweep(5000.0), 0);
        assert_eq!(cache.sweep(5001.0), 1);
        assert!(!cache.contains("old"));
        assert!(cache.contains("kept"));
        assert_eq!(cache.stats().expired, 1);

        // Order queue was pruned: filling to capacity evicts "kept" first
        for i in 0..99 {
            cache.get_or_create(&format!("n{}", i), || 0);
        }
        cache.get_or_create("overflow", || 0);
        assert!(!cache.contains("kept"));
    }

    #[test]
    fn test_rebase_restarts_entry_ages() {
        let mut cache: ResourceCache<u8> = ResourceCache::default();
        cache.begin_frame(50_000.0);
        cache.get_or_create("late", || 1);

        cache.rebase(10.0);
        assert_eq!(cache.sweep(5010.0), 0);
        assert_eq!(cache.sweep(5011.0), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_colors_share_the_cache() {
        let mut cache: ResourceCache<u8> = ResourceCache::default();
        let a = cache.get_or_create_color(200.0, 80.0, 50.0, 0.5);
        let b = cache.get_or_create_color(200.0, 80.0, 50.0, 0.5);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("hsla-200.0-80.0-50.0-0.50"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_kind_mismatch_rebuilds() {
        let mut cache: ResourceCache<u8> = ResourceCache::default();
        cache.get_or_create_color(10.0, 10.0, 10.0, 0.1);
        let value = cache.get_or_create("hsla-10.0-10.0-10.0-0.10", || 3);
        assert_eq!(value, 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache: ResourceCache<u8> = ResourceCache::default();
        cache.get_or_create("a", || 1);
        cache.get_or_create_color(0.0, 0.0, 0.0, 0.0);
        cache.clear();
        assert!(cache.is_empty());
    }
}
