use serde::{Deserialize, Serialize};

/// Fixed-capacity, insertion-ordered buffer. Once full, the entry furthest
/// from the insertion edge is silently evicted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundedHistory<T> {
    cap: usize,
    items: Vec<T>,
}

impl<T> BoundedHistory<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: Vec::new(),
        }
    }

    /// Inserts at the front (newest-first ordering) and truncates to capacity.
    pub fn push_front(&mut self, item: T) {
        self.items.insert(0, item);
        self.items.truncate(self.cap);
    }

    /// Removes every entry matching `same`, appends `item` at the back, then
    /// keeps only the most recent `cap` entries. Used for per-identifier
    /// last-write-wins buffers.
    pub fn replace_or_append(&mut self, item: T, same: impl Fn(&T) -> bool) {
        self.items.retain(|existing| !same(existing));
        self.items.push(item);
        if self.items.len() > self.cap {
            let overflow = self.items.len() - self.cap;
            self.items.drain(..overflow);
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}
