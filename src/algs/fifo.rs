//! Bounded FIFO model of a hardware vertex cache.
//!
//! New vertices enter at the front; once the cache exceeds its capacity the
//! vertex at the back is evicted. A hit does *not* move the vertex, matching
//! post-transform caches that are FIFOs rather than LRUs.

use std::collections::VecDeque;

/// Result of touching a vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Touch {
    /// The vertex was already cached.
    Hit,
    /// The vertex was inserted at the front, possibly evicting the tail.
    Miss { evicted: Option<u32> },
}

/// Bounded sequence of vertex indices, most recently inserted first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FifoCache {
    entries: VecDeque<u32>,
    capacity: usize,
}

impl FifoCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, v: u32) -> bool {
        self.entries.contains(&v)
    }

    /// Reference vertex `v`, inserting it on a miss.
    pub fn touch(&mut self, v: u32) -> Touch {
        if self.contains(v) {
            return Touch::Hit;
        }
        self.entries.push_front(v);
        let evicted = if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        Touch::Miss { evicted }
    }

    /// Cached vertices from front (slot 0) to back.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }
}
