//! Breadth-first crawl frontier: a FIFO of pending pages and the visited set.

use std::collections::{HashSet, VecDeque};

/// A page waiting to be fetched, with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Pending entries plus every URL ever dequeued for fetching.
///
/// The visited set only grows. A URL may sit in the queue more than once;
/// callers collapse duplicates when they pop.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the seed URL at depth 0
    pub fn seed(url: impl Into<String>) -> Self {
        let mut frontier = Self::new();
        frontier.push(FrontierEntry::new(url, 0));
        frontier
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Record `url` as visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string());
        true
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::seed("https://example.com/");
        frontier.push(FrontierEntry::new("https://example.com/a", 1));
        frontier.push(FrontierEntry::new("https://example.com/b", 1));

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop().unwrap().depth, 0);
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/a");
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/b");
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_visited_set_only_grows() {
        let mut frontier = Frontier::new();
        assert!(frontier.mark_visited("https://example.com/"));
        assert!(!frontier.mark_visited("https://example.com/"));
        assert!(frontier.is_visited("https://example.com/"));
        assert!(!frontier.is_visited("https://example.com/other"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_queue_allows_duplicates_until_popped() {
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new("https://example.com/a", 1));
        frontier.push(FrontierEntry::new("https://example.com/a", 2));
        assert_eq!(frontier.len(), 2);
    }
}
