//! Bounded cache for interactive SVG previews.
//!
//! Browsing a catalog refetches the same icons constantly; hosts keep one
//! [`PreviewCache`] next to their [`IconifyClient`](crate::IconifyClient)
//! and consult it before calling
//! [`fetch_svg_sized`](crate::IconifyClient::fetch_svg_sized). The cache is
//! owned by the caller and capacity-bounded with least-recently-used
//! eviction, so a long browsing session cannot grow it without limit.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::icon::IconId;

/// Cache key: one icon rendered at one pixel height.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PreviewKey {
    icon: IconId,
    height: u32,
}

/// An LRU cache of fetched preview markup keyed by `(icon, height)`.
///
/// # Example
///
/// ```
/// use iconify_downloader::{IconId, PreviewCache};
///
/// let mut cache = PreviewCache::new(2);
/// let home: IconId = "mdi:home".parse().unwrap();
/// cache.insert(home.clone(), 32, "<svg/>".to_string());
/// assert_eq!(cache.get(&home, 32), Some("<svg/>"));
/// assert_eq!(cache.get(&home, 64), None);
/// ```
#[derive(Debug)]
pub struct PreviewCache {
    capacity: usize,
    entries: HashMap<PreviewKey, String>,
    // Recency order, least recent at the front.
    order: VecDeque<PreviewKey>,
}

impl PreviewCache {
    /// Creates a cache holding at most `capacity` previews. A zero
    /// capacity disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Looks up a preview, marking it most recently used on a hit.
    pub fn get(&mut self, icon: &IconId, height: u32) -> Option<&str> {
        let key = PreviewKey {
            icon: icon.clone(),
            height,
        };
        if !self.entries.contains_key(&key) {
            return None;
        }
        self.touch(&key);
        self.entries.get(&key).map(String::as_str)
    }

    /// Stores a preview, evicting the least recently used entry when full.
    pub fn insert(&mut self, icon: IconId, height: u32, markup: String) {
        if self.capacity == 0 {
            return;
        }
        let key = PreviewKey { icon, height };
        if self.entries.insert(key.clone(), markup).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all cached previews.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: &PreviewKey) {
        if let Some(position) = self.order.iter().position(|k| k == key) {
            self.order.remove(position);
        }
        self.order.push_back(key.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> IconId {
        IconId::parse(raw).unwrap()
    }

    #[test]
    fn caches_per_icon_and_size() {
        let mut cache = PreviewCache::new(4);
        cache.insert(id("mdi:home"), 32, "small".into());
        cache.insert(id("mdi:home"), 64, "large".into());

        assert_eq!(cache.get(&id("mdi:home"), 32), Some("small"));
        assert_eq!(cache.get(&id("mdi:home"), 64), Some("large"));
        assert_eq!(cache.get(&id("mdi:account"), 32), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = PreviewCache::new(2);
        cache.insert(id("mdi:a"), 32, "a".into());
        cache.insert(id("mdi:b"), 32, "b".into());

        // Touch "a" so "b" is now the eviction candidate.
        assert!(cache.get(&id("mdi:a"), 32).is_some());
        cache.insert(id("mdi:c"), 32, "c".into());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&id("mdi:b"), 32).is_none());
        assert!(cache.get(&id("mdi:a"), 32).is_some());
        assert!(cache.get(&id("mdi:c"), 32).is_some());
    }

    #[test]
    fn reinsert_updates_value_without_growth() {
        let mut cache = PreviewCache::new(2);
        cache.insert(id("mdi:a"), 32, "old".into());
        cache.insert(id("mdi:a"), 32, "new".into());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id("mdi:a"), 32), Some("new"));
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let mut cache = PreviewCache::new(0);
        cache.insert(id("mdi:a"), 32, "a".into());
        assert!(cache.is_empty());
        assert_eq!(cache.get(&id("mdi:a"), 32), None);
    }
}
