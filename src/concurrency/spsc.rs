//! A bounded, wait-free single-producer/single-consumer ring queue.
//!
//! Capacity is a compile-time power of two; `CAPACITY - 1` slots are usable
//! (one slot is always left empty so `push`/`pop` can tell full from empty
//! without a separate counter, matching the original's `next == tail` check).
//! There are no blocking primitives: `push` returns `false` when full, `pop`
//! returns `None` when empty. The two cursors are cache-line padded to avoid
//! false sharing between the producer and consumer threads.

use crossbeam::utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A bounded SPSC ring queue of `CAPACITY` slots (`CAPACITY - 1` usable).
///
/// # Safety contract
///
/// A single thread must call the producer methods (`push`, `try_emplace`)
/// and a single thread must call the consumer methods (`pop`, `try_pop_ref`,
/// `clear`). Mixing producers or mixing consumers is undefined behavior;
/// the type itself cannot detect a violation.
pub struct SpscQueue<T, const CAPACITY: usize> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

unsafe impl<T: Send, const CAPACITY: usize> Send for SpscQueue<T, CAPACITY> {}
unsafe impl<T: Send, const CAPACITY: usize> Sync for SpscQueue<T, CAPACITY> {}

const fn mask(capacity: usize) -> usize {
    capacity - 1
}

impl<T, const CAPACITY: usize> SpscQueue<T, CAPACITY> {
    /// Creates an empty queue. Panics if `CAPACITY` is not a power of two.
    pub fn new() -> Self {
        assert!(CAPACITY.is_power_of_two(), "SpscQueue capacity must be a power of two");
        assert!(CAPACITY >= 2, "SpscQueue capacity must be at least 2");

        let mut buffer = Vec::with_capacity(CAPACITY);
        for _ in 0..CAPACITY {
            buffer.push(UnsafeCell::new(MaybeUninit::uninit()));
        }

        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            buffer: buffer.into_boxed_slice(),
        }
    }

    /// Number of usable slots (`CAPACITY - 1`).
    pub const fn capacity(&self) -> usize {
        CAPACITY - 1
    }

    /// Pushes `value`. Returns `false` without modifying the queue if full.
    pub fn push(&self, value: T) -> bool {
        self.try_emplace(move || value)
    }

    /// Constructs a value in place from `ctor`, avoiding a prior move.
    /// Returns `false` without calling `ctor` if the queue is full.
    pub fn try_emplace<F>(&self, ctor: F) -> bool
    where
        F: FnOnce() -> T,
    {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & mask(CAPACITY);

        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }

        // SAFETY: only the producer thread ever writes `head`'s slot, and
        // the consumer has not yet observed `next` as published.
        unsafe {
            let slot = self.buffer[head].get();
            (*slot).write(ctor());
        }
        self.head.store(next, Ordering::Release);
        true
    }

    /// Pops and returns the next value, or `None` if empty.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the slot at `tail` was published by the producer and has
        // not yet been consumed; only this consumer thread reads it.
        let value = unsafe {
            let slot = self.buffer[tail].get();
            (*slot).assume_init_read()
        };

        let next = (tail + 1) & mask(CAPACITY);
        self.tail.store(next, Ordering::Release);
        Some(value)
    }

    /// Borrows the next value without moving it out, advancing the cursor
    /// immediately. The returned reference stays valid until the producer
    /// wraps back around and overwrites this slot (`capacity()` pushes
    /// later) — callers that need the value past that point should clone it.
    pub fn try_pop_ref(&self) -> Option<&T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        let next = (tail + 1) & mask(CAPACITY);
        self.tail.store(next, Ordering::Release);

        // SAFETY: see `pop`; the value stays initialized in the buffer
        // until a future `push` overwrites this same slot.
        unsafe {
            let slot = self.buffer[tail].get();
            Some((*slot).assume_init_ref())
        }
    }

    /// Drops every remaining element, leaving the queue empty.
    pub fn clear(&self) {
        while self.pop().is_some() {}
    }

    /// `true` iff there are no elements to pop.
    pub fn empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// `true` iff a `push` would currently fail.
    pub fn full(&self) -> bool {
        let next = (self.head.load(Ordering::Acquire) + 1) & mask(CAPACITY);
        next == self.tail.load(Ordering::Acquire)
    }

    /// Number of elements currently queued.
    pub fn size(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head.wrapping_add(CAPACITY).wrapping_sub(tail)) & mask(CAPACITY)
    }
}

impl<T, const CAPACITY: usize> Default for SpscQueue<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> Drop for SpscQueue<T, CAPACITY> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_order() {
        let q: SpscQueue<i32, 8> = SpscQueue::new();
        for i in 0..7 {
            assert!(q.push(i));
        }
        // one slot always stays empty
        assert!(!q.push(999));

        for i in 0..7 {
            assert_eq!(q.pop(), Some(i));
        }
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn push_false_iff_size_is_capacity_minus_one() {
        let q: SpscQueue<u8, 4> = SpscQueue::new();
        assert!(q.push(1));
        assert!(q.push(2));
        assert!(q.push(3));
        assert_eq!(q.size(), 3);
        assert!(q.full());
        assert!(!q.push(4));
    }

    #[test]
    fn drop_destroys_remaining_elements_once() {
        use std::sync::Arc;
        use std::sync::atomic::AtomicUsize as Counter;

        struct DropCounter(Arc<Counter>);
        impl Drop for DropCounter {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let count = Arc::new(Counter::new(0));
        {
            let q: SpscQueue<DropCounter, 8> = SpscQueue::new();
            for _ in 0..5 {
                q.push(DropCounter(count.clone()));
            }
        }
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn concurrent_producer_consumer_preserves_order() {
        use std::sync::Arc;
        use std::thread;

        let q: Arc<SpscQueue<u64, 1024>> = Arc::new(SpscQueue::new());
        let producer_q = q.clone();

        let producer = thread::spawn(move || {
            let mut i = 0u64;
            while i < 100_000 {
                if producer_q.push(i) {
                    i += 1;
                }
            }
        });

        let mut expected = 0u64;
        while expected < 100_000 {
            if let Some(v) = q.pop() {
                assert_eq!(v, expected);
                expected += 1;
            }
        }
        producer.join().unwrap();
    }
}
