//! Bounded MPMC buffer between requesters and resolvers
//!
//! One mutex guards the slots, the occupancy and the shutdown flag.
//! Producers wait on `not_full`, consumers wait on `not_empty`, so a wake-up
//! only ever reaches the role that can make progress. Every wait re-checks
//! its predicate in a loop.

use std::collections::VecDeque;
use parking_lot::{Condvar, Mutex};
use crate::error::PushError;

/// Fixed-capacity FIFO shared by reference between every worker thread.
///
/// Items are moved in by [`push`](Self::push) and moved out by
/// [`pop`](Self::pop); no two threads ever hold the same item.
///
/// # Example
///
/// ```
/// use lookup_core::BoundedBuffer;
///
/// let buffer = BoundedBuffer::new(2);
/// buffer.push("a.com".to_string()).unwrap();
/// assert_eq!(buffer.pop().as_deref(), Some("a.com"));
/// ```
pub struct BoundedBuffer<T> {
    /// Slots, occupancy and shutdown flag
    pub(crate) state: Mutex<BufferState<T>>,

    /// Producers park here while the buffer is full
    not_full: Condvar,

    /// Consumers park here while the buffer is empty and not shut down
    pub(crate) not_empty: Condvar,

    /// Maximum number of items held at once
    capacity: usize,
}

pub(crate) struct BufferState<T> {
    /// Buffered items, oldest first
    slots: VecDeque<T>,

    /// Set once, after every producer has returned
    pub(crate) shutdown: bool,

    pushed: u64,
    popped: u64,
    peak: usize,
}

/// Counters read under the buffer lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Items accepted by `push`
    pub pushed: u64,
    /// Items handed out by `pop`
    pub popped: u64,
    /// Highest occupancy ever observed
    pub peak: usize,
}

impl<T> BoundedBuffer<T> {
    /// Create an empty buffer holding at most `capacity` items
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; such a buffer could never accept an item.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "bounded buffer capacity must be at least 1");
        Self {
            state: Mutex::new(BufferState {
                slots: VecDeque::with_capacity(capacity),
                shutdown: false,
                pushed: 0,
                popped: 0,
                peak: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Insert an item, blocking while the buffer is full
    ///
    /// Wakes one waiting consumer. Returns the item inside `PushError` if the
    /// buffer was shut down, since no consumer would ever take it.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut state = self.state.lock();
        while state.slots.len() == self.capacity && !state.shutdown {
            self.not_full.wait(&mut state);
        }
        if state.shutdown {
            return Err(PushError(item));
        }

        state.slots.push_back(item);
        state.pushed += 1;
        state.peak = state.peak.max(state.slots.len());
        debug_assert!(state.slots.len() <= self.capacity);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest item, blocking while the buffer is empty
    ///
    /// Returns `None` only once the buffer is empty *and* shut down; buffered
    /// items are always drained before the flag is honoured. Wakes one
    /// waiting producer.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.slots.is_empty() && !state.shutdown {
            self.not_empty.wait(&mut state);
        }

        let item = state.slots.pop_front()?;
        state.popped += 1;

        self.not_full.notify_one();
        Some(item)
    }

    /// Number of buffered items
    pub fn len(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.state.lock().slots.is_empty()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the shutdown flag has been set
    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shutdown
    }

    /// Snapshot of the push/pop counters and peak occupancy
    pub fn stats(&self) -> BufferStats {
        let state = self.state.lock();
        BufferStats {
            pushed: state.pushed,
            popped: state.popped,
            peak: state.peak,
        }
    }

    /// Wake every parked producer so it can observe the shutdown flag.
    pub(crate) fn wake_producers(&self) {
        self.not_full.notify_all();
    }
}

impl<T> std::fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_lock() {
            Some(state) => f
                .debug_struct("BoundedBuffer")
                .field("len", &state.slots.len())
                .field("capacity", &self.capacity)
                .field("shutdown", &state.shutdown)
                .finish(),
            None => f
                .debug_struct("BoundedBuffer")
                .field("capacity", &self.capacity)
                .field("state", &"<locked>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::join_producers;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn close<T>(buffer: &BoundedBuffer<T>) {
        let (proof, _) = join_producers(Vec::<thread::JoinHandle<()>>::new());
        buffer.shut_down(proof);
    }

    #[test]
    fn test_fifo_order() {
        let buffer = BoundedBuffer::new(4);
        for i in 0..4 {
            buffer.push(i).unwrap();
        }
        assert_eq!(buffer.len(), 4);
        for i in 0..4 {
            assert_eq!(buffer.pop(), Some(i));
        }
        assert!(buffer.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_zero_capacity_rejected() {
        let _ = BoundedBuffer::<u32>::new(0);
    }

    #[test]
    fn test_pop_drains_before_shutdown_is_honoured() {
        let buffer = BoundedBuffer::new(3);
        buffer.push("a").unwrap();
        buffer.push("b").unwrap();
        close(&buffer);

        assert_eq!(buffer.pop(), Some("a"));
        assert_eq!(buffer.pop(), Some("b"));
        assert_eq!(buffer.pop(), None);
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn test_push_after_shutdown_returns_item() {
        let buffer = BoundedBuffer::new(1);
        close(&buffer);
        let err = buffer.push(7).unwrap_err();
        assert_eq!(err.into_inner(), 7);
        assert_eq!(buffer.stats().pushed, 0);
    }

    #[test]
    fn test_push_blocks_while_full() {
        let buffer = Arc::new(BoundedBuffer::new(1));
        buffer.push(1).unwrap();

        let pushed = Arc::new(AtomicBool::new(false));
        let handle = {
            let buffer = Arc::clone(&buffer);
            let pushed = Arc::clone(&pushed);
            thread::spawn(move || {
                buffer.push(2).unwrap();
                pushed.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!pushed.load(Ordering::SeqCst), "push must wait for a free slot");

        assert_eq!(buffer.pop(), Some(1));
        handle.join().unwrap();
        assert!(pushed.load(Ordering::SeqCst));
        assert_eq!(buffer.pop(), Some(2));
    }

    #[test]
    fn test_shutdown_wakes_every_parked_consumer() {
        let buffer = BoundedBuffer::<String>::new(2);
        let finished = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(buffer.pop(), None);
                    finished.fetch_add(1, Ordering::SeqCst);
                });
            }

            thread::sleep(Duration::from_millis(50));
            assert_eq!(finished.load(Ordering::SeqCst), 0);
            close(&buffer);
        });

        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_concurrent_no_loss_and_bounded() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 500;

        let buffer = BoundedBuffer::new(3);
        let consumed = AtomicUsize::new(0);
        let sum = AtomicUsize::new(0);

        thread::scope(|s| {
            let producers: Vec<_> = (0..PRODUCERS)
                .map(|p| {
                    let buffer = &buffer;
                    s.spawn(move || {
                        for i in 0..PER_PRODUCER {
                            buffer.push(p * PER_PRODUCER + i).unwrap();
                        }
                    })
                })
                .collect();

            let consumers: Vec<_> = (0..3)
                .map(|_| {
                    s.spawn(|| {
                        while let Some(v) = buffer.pop() {
                            consumed.fetch_add(1, Ordering::Relaxed);
                            sum.fetch_add(v, Ordering::Relaxed);
                        }
                    })
                })
                .collect();

            let (proof, results) = join_producers(producers);
            assert!(results.iter().all(|r| r.is_ok()));
            assert!(buffer.shut_down(proof));

            for c in consumers {
                c.join().unwrap();
            }
        });

        let total = PRODUCERS * PER_PRODUCER;
        assert_eq!(consumed.load(Ordering::Relaxed), total);
        assert_eq!(sum.load(Ordering::Relaxed), total * (total - 1) / 2);

        let stats = buffer.stats();
        assert_eq!(stats.pushed, total as u64);
        assert_eq!(stats.popped, total as u64);
        assert!(stats.peak <= buffer.capacity());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_capacity_one_strict_handoff() {
        let buffer = BoundedBuffer::new(1);
        let mut received = Vec::new();

        thread::scope(|s| {
            let producer = s.spawn(|| {
                for i in 0..5 {
                    buffer.push(i).unwrap();
                }
            });
            let consumer = s.spawn(|| {
                let mut out = Vec::new();
                while let Some(v) = buffer.pop() {
                    out.push(v);
                }
                out
            });

            let (proof, _) = join_producers(vec![producer]);
            buffer.shut_down(proof);
            received = consumer.join().unwrap();
        });

        assert_eq!(received, vec![0, 1, 2, 3, 4]);
        assert_eq!(buffer.stats().peak, 1);
    }
}
