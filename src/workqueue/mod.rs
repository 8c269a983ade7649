//! Provides a queue of top-level primitive indices for the worker
//! threads. The queue itself is not changed after creation, workers
//! simply walk through it with an atomic counter holding the index of
//! the next primitive to dice.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use tracing::warn;

/// The queue of primitives to be worked on, shared immutably between
/// worker threads.
pub struct PrimitiveQueue {
    /// Indices into the scene's primitive list
    primitives: Vec<usize>,
    /// Index of the next primitive to be worked on
    next: AtomicUsize,
}

impl PrimitiveQueue {
    /// Create a queue for *n_primitives* primitives. If `select.1` is
    /// non-zero only `select.1` primitives starting at `select.0` are
    /// queued.
    pub fn new(n_primitives: usize, select: (usize, usize)) -> PrimitiveQueue {
        let mut primitives: Vec<usize> = (0..n_primitives).collect();
        if select.1 > 0 {
            primitives = primitives
                .into_iter()
                .skip(select.0)
                .take(select.1)
                .collect();
        }
        if primitives.is_empty() {
            warn!("primitive queue is empty");
        }
        PrimitiveQueue {
            primitives,
            next: AtomicUsize::new(0),
        }
    }
    /// Get an iterator to work through the queue
    pub fn iter(&self) -> PrimitiveQueueIterator {
        PrimitiveQueueIterator { queue: self }
    }
    /// Get the next primitive index or None if the queue is finished
    pub fn next(&self) -> Option<usize> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        self.primitives.get(i).copied()
    }
    pub fn len(&self) -> usize {
        self.primitives.len()
    }
    /// Check if every primitive was handed out
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.primitives.len()
    }
}

/// Iterator to work through the queue safely
pub struct PrimitiveQueueIterator<'a> {
    queue: &'a PrimitiveQueue,
}

impl<'a> Iterator for PrimitiveQueueIterator<'a> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        self.queue.next()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_index_once_across_threads() {
        let queue = PrimitiveQueue::new(100, (0, 0));
        let mut seen: Vec<usize> = Vec::new();
        crossbeam::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|_| queue.iter().collect::<Vec<usize>>()))
                .collect();
            for handle in handles {
                seen.extend(handle.join().unwrap());
            }
        })
        .unwrap();
        seen.sort();
        assert_eq!(seen, (0..100).collect::<Vec<usize>>());
        assert!(queue.is_empty());
    }

    #[test]
    fn selection() {
        let queue = PrimitiveQueue::new(10, (3, 2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.iter().collect::<Vec<usize>>(), vec![3, 4]);
    }
}
