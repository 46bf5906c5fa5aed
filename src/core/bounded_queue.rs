//! Capacity-limited FIFO buffer with observable occupancy.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::events::{EventStream, ValueTopic};
use crate::core::SchedulerError;

/// Ordered, capacity-limited buffer.
///
/// Items leave in arrival order. Capacity may be changed at any time; shrinking
/// it below the current size evicts nothing, it only rejects pushes until the
/// queue drains below the new bound.
///
/// Every successful mutation publishes the new size on a [`ValueTopic`], so
/// observers always see the latest occupancy on subscribe.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    capacity: usize,
    items: VecDeque<T>,
    size: ValueTopic<usize>,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue bounded by `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity.min(1024)),
            size: ValueTopic::new(0),
        }
    }

    /// Append `item` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::QueueFull`] when no slot is free; the queue
    /// is left untouched.
    pub fn push(&mut self, item: T) -> Result<(), SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.items.push_back(item);
        self.notify();
        Ok(())
    }

    /// Remove and return the head item, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_front()?;
        self.notify();
        Some(item)
    }

    /// Remove the first item matching `pred`. Returns whether one was found.
    pub fn remove_where<F>(&mut self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let Some(index) = self.items.iter().position(pred) else {
            return false;
        };
        self.items.remove(index);
        self.notify();
        true
    }

    /// Put a just-popped item back at the head, regardless of capacity.
    ///
    /// The item held a slot a moment ago, so restoring it never grows the
    /// queue past what it already admitted.
    pub fn restore_front(&mut self, item: T) {
        self.items.push_front(item);
        self.notify();
    }

    /// Replace the capacity. Items beyond the new bound are kept.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Configured upper bound.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Slots left before the queue is full; zero while over capacity.
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// True when no further push can succeed.
    pub fn is_full(&self) -> bool {
        self.free_slots() < 1
    }

    /// True when the queue holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subscribe to size changes. The current size is delivered immediately.
    pub fn watch_size(&self) -> EventStream<usize> {
        self.size.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    fn notify(&self) {
        self.size.publish(self.items.len());
    }
}

impl<T: ?Sized> BoundedQueue<Arc<T>> {
    /// Remove the first occurrence of `item` by identity (pointer equality).
    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        self.remove_where(|held| Arc::ptr_eq(held, item))
    }
}
