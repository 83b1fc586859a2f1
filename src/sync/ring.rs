//! Bounded ring buffer between the input loop and the dispatcher.
//!
//! One mutex, two conditions (`not_full`, `not_empty`). Both operations are
//! FIFO and report the slot index they touched so the producer and consumer
//! can log matching `Circular_Buffer Index` lines. Built for one producer
//! and one consumer but safe with several producers.
//!
//! ## Rules
//! - `push` blocks while the ring is full; `pop` blocks while it is empty.
//! - There is no close/cancel path; waiters leave only when signalled.
//! - The internal mutex is the leaf of the lock order; no other lock is
//!   ever acquired while it is held.

use std::sync::{Condvar, Mutex};

struct RingState<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
}

/// Fixed-capacity blocking ring buffer.
pub struct Ring<T> {
    state: Mutex<RingState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> Ring<T> {
    /// Creates a ring with the given capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            state: Mutex::new(RingState {
                slots,
                head: 0,
                tail: 0,
                count: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocks until a slot is free, stores `item`, and returns the slot
    /// index it used.
    pub fn push(&self, item: T) -> usize {
        let mut state = self.state.lock().expect("ring mutex poisoned");
        while state.count == self.capacity {
            state = self.not_full.wait(state).expect("ring mutex poisoned");
        }
        let index = state.head;
        state.slots[index] = Some(item);
        state.head = (state.head + 1) % self.capacity;
        state.count += 1;
        self.not_empty.notify_one();
        index
    }

    /// Blocks until an item is available and returns it with the slot index
    /// it came from.
    pub fn pop(&self) -> (T, usize) {
        let mut state = self.state.lock().expect("ring mutex poisoned");
        while state.count == 0 {
            state = self.not_empty.wait(state).expect("ring mutex poisoned");
        }
        let index = state.tail;
        let item = state.slots[index].take().expect("occupied slot was empty");
        state.tail = (state.tail + 1) % self.capacity;
        state.count -= 1;
        self.not_full.notify_one();
        (item, index)
    }

    /// Items currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().expect("ring mutex poisoned").count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order_and_slot_indices() {
        let ring = Ring::new(4);
        assert_eq!(ring.push("a"), 0);
        assert_eq!(ring.push("b"), 1);
        assert_eq!(ring.push("c"), 2);

        assert_eq!(ring.pop(), ("a", 0));
        assert_eq!(ring.pop(), ("b", 1));

        // Indices wrap around the fixed capacity.
        assert_eq!(ring.push("d"), 3);
        assert_eq!(ring.push("e"), 0);
        assert_eq!(ring.pop(), ("c", 2));
        assert_eq!(ring.pop(), ("d", 3));
        assert_eq!(ring.pop(), ("e", 0));
    }

    #[test]
    fn push_blocks_when_full() {
        let ring = Arc::new(Ring::new(2));
        ring.push(1);
        ring.push(2);

        let producer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.push(3))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        assert_eq!(ring.len(), 2);

        assert_eq!(ring.pop().0, 1);
        producer.join().unwrap();
        assert_eq!(ring.pop().0, 2);
        assert_eq!(ring.pop().0, 3);
    }

    #[test]
    fn pop_blocks_when_empty() {
        let ring: Arc<Ring<u32>> = Arc::new(Ring::new(2));
        let consumer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.pop().0)
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());
        ring.push(9);
        assert_eq!(consumer.join().unwrap(), 9);
    }

    #[test]
    fn tolerates_multiple_producers() {
        let ring = Arc::new(Ring::new(3));
        let producers: Vec<_> = (0..8)
            .map(|i| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    ring.push(i);
                })
            })
            .collect();

        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(ring.pop().0);
        }
        for p in producers {
            p.join().unwrap();
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
