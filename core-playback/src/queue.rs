//! Playback queue

use core_library::Track;
use std::collections::VecDeque;

/// FIFO of tracks waiting to be played.
///
/// Duplicates are allowed and there is no capacity limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackQueue {
    entries: VecDeque<Track>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tracks to the back, keeping their order
    pub fn enqueue(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.entries.extend(tracks);
    }

    /// Remove and return the front track
    pub fn dequeue_next(&mut self) -> Option<Track> {
        self.entries.pop_front()
    }

    pub fn peek(&self) -> Option<&Track> {
        self.entries.front()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pending tracks, front first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.entries.iter()
    }
}

impl FromIterator<Track> for PlaybackQueue {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::track;

    #[test]
    fn test_fifo_order() {
        let mut queue = PlaybackQueue::new();
        queue.enqueue([track("a"), track("b")]);
        queue.enqueue([track("c")]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().map(|t| t.id.as_str()), Some("a"));
        assert_eq!(queue.dequeue_next().unwrap().id, "a");
        assert_eq!(queue.dequeue_next().unwrap().id, "b");
        assert_eq!(queue.dequeue_next().unwrap().id, "c");
        assert_eq!(queue.dequeue_next(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut queue: PlaybackQueue = [track("a"), track("a")].into_iter().collect();
        queue.enqueue([track("a")]);

        let ids: Vec<&str> = queue.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "a"]);
    }

    #[test]
    fn test_clear() {
        let mut queue = PlaybackQueue::new();
        queue.enqueue([track("a")]);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
    }
}
