//! Bounded live feed log.

use std::collections::VecDeque;

use forensic_spi::FeedEntry;

/// Truncate `name` to at most `width` characters.
pub fn truncate_name(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

/// FIFO log of feed entries; the oldest entry is evicted past capacity.
#[derive(Debug, Clone)]
pub struct FeedLog {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
}

impl FeedLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, entry: FeedEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&FeedEntry> {
        self.entries.back()
    }

    pub fn to_vec(&self) -> Vec<FeedEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for FeedLog {
    fn default() -> Self {
        Self::new(1000)
    }
}
