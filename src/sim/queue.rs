//! Producer/consumer queues
//!
//! Taps and contacts are appended by collaborators (input capture, collision
//! detection) that may run on another thread, and drained once per frame by
//! the simulation. Pushes are lock-free; `drain` belongs to the frame loop.

use std::sync::Arc;

use crossbeam::queue::SegQueue;

/// Cloneable FIFO handle. All clones share one buffer.
#[derive(Debug)]
pub struct EventQueue<T> {
    inner: Arc<SegQueue<T>>,
}

impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SegQueue::new()),
        }
    }

    /// Append one entry (producer side). Safe from any thread.
    pub fn push(&self, item: T) {
        self.inner.push(item);
    }

    /// Take every queued entry in arrival order, leaving the queue empty.
    ///
    /// Call from the frame loop only; concurrent drains would split the batch.
    pub fn drain(&self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.inner.len());
        while let Some(item) = self.inner.pop() {
            items.push(item);
        }
        items
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        while self.inner.pop().is_some() {}
    }
}

/// A single discrete tap from the input-capture collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap;

pub type TapQueue = EventQueue<Tap>;
