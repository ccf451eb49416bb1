// src/watcher/recent.rs

use std::collections::{HashSet, VecDeque};

/// A fixed-capacity memory of recently seen lines.
/// When full, the oldest line is forgotten to make room for the newest.
#[derive(Debug)]
pub struct RecentLines {
    capacity: usize,
    order: VecDeque<String>,
    index: HashSet<String>,
}

impl RecentLines {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            index: HashSet::with_capacity(capacity),
        }
    }

    /// Remembers `line`. Returns `false` if it was already remembered.
    pub fn insert(&mut self, line: &str) -> bool {
        if self.index.contains(line) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.index.remove(&oldest);
            }
        }
        self.order.push_back(line.to_string());
        self.index.insert(line.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicates() {
        let mut recent = RecentLines::new(4);
        assert!(recent.insert("a"));
        assert!(!recent.insert("a"));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn never_grows_past_capacity() {
        let mut recent = RecentLines::new(2);
        assert!(recent.insert("a"));
        assert!(recent.insert("b"));
        assert!(recent.insert("c"));
        assert_eq!(recent.len(), 2);
        // "a" was evicted, so it is new again.
        assert!(recent.insert("a"));
        assert!(!recent.insert("c"));
    }

    #[test]
    fn zero_capacity_still_remembers_one() {
        let mut recent = RecentLines::new(0);
        assert!(recent.is_empty());
        assert!(recent.insert("x"));
        assert!(!recent.insert("x"));
    }
}
