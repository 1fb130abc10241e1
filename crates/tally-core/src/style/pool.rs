//! Content-addressed interning pool

use ahash::AHashMap;
use std::hash::{Hash, Hasher};

/// Interning table: structurally equal values share one index.
///
/// Index 0 always holds the seed value given at construction. Lookups go
/// through a 64-bit content hash; equality is checked on every hit so hash
/// collisions never merge distinct values.
#[derive(Debug, Clone)]
pub struct InternPool<T> {
    items: Vec<T>,
    buckets: AHashMap<u64, Vec<u32>>,
}

fn content_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = ahash::AHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

impl<T: Hash + Eq + Clone> InternPool<T> {
    /// Create a pool holding `seed` at index 0
    pub fn new(seed: T) -> Self {
        let mut pool = Self {
            items: Vec::with_capacity(16),
            buckets: AHashMap::with_capacity(16),
        };
        pool.push(seed);
        pool
    }

    fn push(&mut self, value: T) -> u32 {
        let index = self.items.len() as u32;
        self.buckets
            .entry(content_hash(&value))
            .or_default()
            .push(index);
        self.items.push(value);
        index
    }

    /// Index of an equal value, if present
    pub fn find(&self, value: &T) -> Option<u32> {
        self.buckets
            .get(&content_hash(value))?
            .iter()
            .copied()
            .find(|&i| self.items[i as usize] == *value)
    }

    /// Return the index of an equal value, adding `value` if none exists.
    /// The flag is true when the value was newly added.
    pub fn get_or_insert(&mut self, value: T) -> (u32, bool) {
        match self.find(&value) {
            Some(index) => (index, false),
            None => (self.push(value), true),
        }
    }

    /// Overwrite the value at `index`, keeping its id
    pub fn replace(&mut self, index: u32, value: T) -> bool {
        let Some(slot) = self.items.get(index as usize) else {
            return false;
        };
        let old_hash = content_hash(slot);
        if let Some(bucket) = self.buckets.get_mut(&old_hash) {
            bucket.retain(|&i| i != index);
            if bucket.is_empty() {
                self.buckets.remove(&old_hash);
            }
        }
        self.buckets
            .entry(content_hash(&value))
            .or_default()
            .push(index);
        self.items[index as usize] = value;
        true
    }

    /// Value by index
    pub fn get(&self, index: u32) -> Option<&T> {
        self.items.get(index as usize)
    }

    /// Number of values, including the seed
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: the seed is never removed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Values in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.items.iter().enumerate().map(|(i, v)| (i as u32, v))
    }

    /// Values in index order, as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Drop everything and start over from a new seed
    pub fn reset(&mut self, seed: T) {
        self.items.clear();
        self.buckets.clear();
        self.push(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Format, FontStyle};

    #[test]
    fn test_seed_at_zero() {
        let pool = InternPool::new(Format::default());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.find(&Format::default()), Some(0));
    }

    #[test]
    fn test_deduplication() {
        let mut pool = InternPool::new(Format::default());
        let bold = Format::default().with_font(FontStyle::new().with_bold(true));
        let red = Format::default().with_font(FontStyle::new().with_color(Color::RED));

        assert_eq!(pool.get_or_insert(bold.clone()), (1, true));
        assert_eq!(pool.get_or_insert(bold), (1, false));
        assert_eq!(pool.get_or_insert(red), (2, true));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_replace_rehashes() {
        let mut pool = InternPool::new(1u32);
        pool.get_or_insert(2);
        assert!(pool.replace(0, 7));
        assert_eq!(pool.find(&1), None);
        assert_eq!(pool.find(&7), Some(0));
        assert_eq!(pool.get_or_insert(7), (0, false));
        assert!(!pool.replace(9, 1));
    }

    #[test]
    fn test_reset() {
        let mut pool = InternPool::new("a");
        pool.get_or_insert("b");
        pool.reset("z");
        assert_eq!(pool.as_slice(), &["z"]);
    }
}
