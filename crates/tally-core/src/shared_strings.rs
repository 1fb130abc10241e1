//! Shared string table

use crate::text::{RichText, SharedText};
use ahash::AHashMap;

/// Deduplicated workbook text, in insertion order.
///
/// Cells hold a [`SharedText`] handle to the same allocation as the table, so
/// interning a string twice never copies it. Positions are the indices
/// written to `t="s"` cells.
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    items: Vec<SharedText>,
    lookup: AHashMap<RichText, u32>,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `text`, appending it if absent
    pub fn intern(&mut self, text: RichText) -> u32 {
        self.push(text, false)
    }

    /// Append `text`. With `allow_duplicates` off an equal entry is reused;
    /// with it on a new slot is always created (files may repeat strings).
    pub fn push(&mut self, text: RichText, allow_duplicates: bool) -> u32 {
        if !allow_duplicates {
            if let Some(&index) = self.lookup.get(&text) {
                return index;
            }
        }
        let index = self.items.len() as u32;
        self.lookup.entry(text.clone()).or_insert(index);
        self.items.push(SharedText::new(text));
        index
    }

    /// Entry by index
    pub fn get(&self, index: u32) -> Option<&SharedText> {
        self.items.get(index as usize)
    }

    /// Index of an equal entry
    pub fn index_of(&self, text: &RichText) -> Option<u32> {
        self.lookup.get(text).copied()
    }

    /// All entries in insertion order
    pub fn get_all(&self) -> &[SharedText] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedText> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.lookup.clear();
    }
}
