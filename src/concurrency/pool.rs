//! A fixed-capacity pool of ref-counted, poolable objects.
//!
//! Each slot embeds its refcount directly (no separate heap allocation per
//! handle). `acquire` hands out a [`Handle`] that shares ownership of a
//! slot; when the last `Handle` drops, the slot's [`Poolable::clear`] runs
//! and the slot returns to the free list. Capacity exhaustion is not an
//! error: `acquire` returns `None` and the caller drops the event.
//!
//! The free list is a [`crossbeam::queue::ArrayQueue`] rather than the
//! single-producer/single-consumer queue the original implementation uses,
//! because handles routinely travel to multiple subscriber threads and the
//! *last* one to drop returns the slot — i.e. release is multi-producer,
//! not single-producer. `ArrayQueue` is lock-free and bounded, matching the
//! "no allocation after construction" property without requiring every
//! release to happen on one designated thread.

use crossbeam::queue::ArrayQueue;
use std::cell::UnsafeCell;
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A type that can live in a [`Pool`] slot.
///
/// `clear` runs exactly once, on the 1→0 refcount transition, before the
/// slot is returned to the free list — it should reset the value to a
/// neutral state so the next `acquire` sees no stale data.
pub trait Poolable: Default {
    /// Resets the value to a neutral state before it re-enters the free list.
    fn clear(&mut self);
}

struct Slot<T> {
    value: UnsafeCell<T>,
    refcount: AtomicUsize,
}

// SAFETY: access to `value` is serialized by the refcount protocol: exactly
// one thread holds the only `Handle` during construction (right after
// `acquire`), and after that, `value` is only read through `&T`/`&mut T` via
// `Handle::get`/`get_mut`, which callers must not alias across threads
// without their own synchronization (matching "order books are
// single-writer" in the wider concurrency model).
unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

/// A fixed-capacity pool of `CAPACITY` poolable slots of type `T`.
pub struct Pool<T: Poolable, const CAPACITY: usize> {
    slots: Box<[Slot<T>]>,
    free: ArrayQueue<NonNull<Slot<T>>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

unsafe impl<T: Poolable + Send, const CAPACITY: usize> Send for Pool<T, CAPACITY> {}
unsafe impl<T: Poolable + Send, const CAPACITY: usize> Sync for Pool<T, CAPACITY> {}

impl<T: Poolable, const CAPACITY: usize> Pool<T, CAPACITY> {
    /// Builds a pool with `CAPACITY` slots, each initialized via `T::default`.
    ///
    /// Returns it already wrapped in an `Arc` because every [`Handle`] keeps
    /// a clone of that `Arc` alive as its "origin" back-pointer.
    pub fn new() -> Arc<Self> {
        let mut slots = Vec::with_capacity(CAPACITY);
        for _ in 0..CAPACITY {
            slots.push(Slot {
                value: UnsafeCell::new(T::default()),
                refcount: AtomicUsize::new(0),
            });
        }
        let slots = slots.into_boxed_slice();

        let free = ArrayQueue::new(CAPACITY);
        for slot in slots.iter() {
            let ptr = NonNull::from(slot);
            free.push(ptr).ok().expect("free list sized to capacity");
        }

        Arc::new(Self {
            slots,
            free,
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        })
    }

    /// Pops a free slot, resets its refcount to 1, and returns a handle to
    /// it. Returns `None` if every slot is currently checked out.
    pub fn acquire(this: &Arc<Self>) -> Option<Handle<T, CAPACITY>> {
        let ptr = this.free.pop()?;
        // SAFETY: this slot just left the free list, so no other `Handle`
        // can observe it until we publish the `Handle` we return.
        unsafe {
            (*ptr.as_ref()).refcount.store(1, Ordering::Release);
        }
        this.acquired.fetch_add(1, Ordering::Relaxed);
        Some(Handle {
            slot: ptr,
            pool: this.clone(),
        })
    }

    /// Number of slots currently checked out.
    pub fn in_use(&self) -> usize {
        self.acquired.load(Ordering::Relaxed) - self.released.load(Ordering::Relaxed)
    }

    /// Total pool capacity.
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    fn release(&self, ptr: NonNull<Slot<T>>) {
        // SAFETY: called only from the 1→0 transition in `Handle::drop`,
        // so we have exclusive access to the slot's value at this point.
        unsafe {
            (*ptr.as_ref().value.get()).clear();
        }
        let _ = self.free.push(ptr);
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

/// A move-or-clone smart reference to a checked-out [`Pool`] slot.
///
/// Cloning increments the slot's embedded refcount; dropping the last clone
/// runs [`Poolable::clear`] and returns the slot to the pool.
pub struct Handle<T: Poolable, const CAPACITY: usize> {
    slot: NonNull<Slot<T>>,
    pool: Arc<Pool<T, CAPACITY>>,
}

unsafe impl<T: Poolable + Send, const CAPACITY: usize> Send for Handle<T, CAPACITY> {}
unsafe impl<T: Poolable + Send + Sync, const CAPACITY: usize> Sync for Handle<T, CAPACITY> {}

impl<T: Poolable, const CAPACITY: usize> Handle<T, CAPACITY> {
    /// Borrows the underlying value.
    pub fn get(&self) -> &T {
        // SAFETY: the handle holds a live reference count, so the slot is
        // checked out and its value is initialized.
        unsafe { &*self.slot.as_ref().value.get() }
    }

    /// Current refcount. Mainly useful for tests/diagnostics.
    pub fn ref_count(&self) -> usize {
        unsafe { self.slot.as_ref().refcount.load(Ordering::Acquire) }
    }
}

impl<T: Poolable, const CAPACITY: usize> std::ops::Deref for Handle<T, CAPACITY> {
    type Target = T;
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: Poolable, const CAPACITY: usize> Clone for Handle<T, CAPACITY> {
    fn clone(&self) -> Self {
        // SAFETY: incrementing while at least one handle is alive keeps the
        // slot checked out for the new handle too.
        unsafe {
            self.slot.as_ref().refcount.fetch_add(1, Ordering::AcqRel);
        }
        Self {
            slot: self.slot,
            pool: self.pool.clone(),
        }
    }
}

impl<T: Poolable, const CAPACITY: usize> Drop for Handle<T, CAPACITY> {
    fn drop(&mut self) {
        // SAFETY: `slot` was checked out by `acquire` and is dropped at
        // most once per live handle.
        let prev = unsafe { self.slot.as_ref().refcount.fetch_sub(1, Ordering::AcqRel) };
        if prev == 1 {
            self.pool.release(self.slot);
        }
    }
}

impl<T: Poolable, const CAPACITY: usize> std::fmt::Debug for Handle<T, CAPACITY> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("ref_count", &self.ref_count()).finish()
    }
}
