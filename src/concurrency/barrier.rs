//! A single-use countdown latch used by the sync event bus to block a
//! publisher until every push-mode subscriber has consumed one tick.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Single-use countdown barrier. Construct with the expected number of
/// completions, have each worker call [`TickBarrier::complete`] once it has
/// consumed the tick, and have the publisher call [`TickBarrier::wait`].
pub struct TickBarrier {
    total: usize,
    completed: AtomicUsize,
}

impl TickBarrier {
    /// Creates a barrier expecting `total` calls to [`TickBarrier::complete`].
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
        }
    }

    /// Signals that one subscriber has consumed this tick. Lock-free.
    pub fn complete(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }

    /// Spins until every expected `complete()` call has landed.
    pub fn wait(&self) {
        let mut spins = 0u32;
        while self.completed.load(Ordering::Acquire) < self.total {
            if spins < 64 {
                std::hint::spin_loop();
            } else {
                thread::yield_now();
            }
            spins = spins.wrapping_add(1);
        }
    }
}

/// RAII guard that calls [`TickBarrier::complete`] on drop, so a worker
/// cannot forget to signal the barrier even if the listener callback panics
/// (the panic is caught around the callback, not around the guard).
pub struct TickGuard<'a> {
    barrier: &'a TickBarrier,
}

impl<'a> TickGuard<'a> {
    /// Wraps `barrier`; dropping the guard calls [`TickBarrier::complete`].
    pub fn new(barrier: &'a TickBarrier) -> Self {
        Self { barrier }
    }
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.barrier.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_returns_once_all_complete() {
        let barrier = Arc::new(TickBarrier::new(3));
        let mut handles = Vec::new();
        for _ in 0..3 {
            let b = barrier.clone();
            handles.push(thread::spawn(move || {
                thread::sleep(Duration::from_millis(5));
                b.complete();
            }));
        }
        barrier.wait();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn guard_completes_on_drop() {
        let barrier = TickBarrier::new(1);
        {
            let _guard = TickGuard::new(&barrier);
        }
        barrier.wait();
    }
}
