//! The generic multi-subscriber event bus.
//!
//! One `EventBus<Event, Policy, QUEUE_SIZE>` fans a single event type out to
//! any number of subscribers, each with its own queue. `Push` subscribers
//! are driven by a bus-owned worker thread per subscriber; `Pull`
//! subscribers only get a handle to their queue via [`EventBus::get_queue`]
//! and drain it on their own schedule. `Policy` picks `SyncPolicy` (the
//! publisher blocks until every push subscriber has processed the tick) or
//! `AsyncPolicy` (fire-and-forget).
//!
//! Only push subscribers participate in the sync completion barrier — a
//! pull subscriber may not drain its queue for an arbitrary amount of time,
//! and counting it would make every publish under `SyncPolicy` hang until
//! that subscriber happened to pop.

use super::policy::DispatchPolicy;
use super::subscriber::{DispatchTarget, SubscriberId, SubscriberMode, TickStamped};
use crate::concurrency::barrier::TickBarrier;
use crate::concurrency::spsc::SpscQueue;
use crate::error::EngineError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::error;

/// Default per-subscriber queue depth (must stay a power of two).
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

struct Entry<Event, Policy, const QUEUE_SIZE: usize>
where
    Policy: DispatchPolicy<Event>,
{
    listener: Arc<dyn DispatchTarget<Event> + Send + Sync>,
    queue: Arc<SpscQueue<Policy::QueueItem, QUEUE_SIZE>>,
    mode: SubscriberMode,
    handle: Option<JoinHandle<()>>,
}

/// A generic, multi-subscriber, multi-threaded event bus.
///
/// Always wrapped in an `Arc`: [`EventBus::start`] spawns threads that each
/// hold a clone of it, mirroring [`crate::concurrency::pool::Pool`]'s
/// associated-function convention rather than exposing a raw
/// `&'static self`.
pub struct EventBus<Event, Policy, const QUEUE_SIZE: usize = DEFAULT_QUEUE_SIZE>
where
    Event: Clone + Send + TickStamped + 'static,
    Policy: DispatchPolicy<Event>,
{
    subs: Mutex<HashMap<SubscriberId, Entry<Event, Policy, QUEUE_SIZE>>>,
    running: AtomicBool,
    drain_on_stop: AtomicBool,
    tick_counter: AtomicU64,
}

impl<Event, Policy, const QUEUE_SIZE: usize> EventBus<Event, Policy, QUEUE_SIZE>
where
    Event: Clone + Send + TickStamped + 'static,
    Policy: DispatchPolicy<Event>,
{
    /// Creates an empty, unstarted bus.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subs: Mutex::new(HashMap::new()),
            running: AtomicBool::new(false),
            drain_on_stop: AtomicBool::new(false),
            tick_counter: AtomicU64::new(0),
        })
    }

    /// If set, a `Push` subscriber's worker thread drains its queue fully
    /// before exiting on [`EventBus::stop`], instead of discarding what's
    /// left queued.
    pub fn enable_drain_on_stop(&self) {
        self.drain_on_stop.store(true, Ordering::Relaxed);
    }

    /// Registers a subscriber. Must be called before [`EventBus::start`];
    /// returns [`EngineError::AlreadyStarted`] otherwise.
    pub fn subscribe(
        &self,
        id: SubscriberId,
        mode: SubscriberMode,
        listener: Arc<dyn DispatchTarget<Event> + Send + Sync>,
    ) -> Result<(), EngineError> {
        if self.running.load(Ordering::Acquire) {
            return Err(EngineError::AlreadyStarted);
        }
        self.subs.lock().insert(
            id,
            Entry {
                listener,
                queue: Arc::new(SpscQueue::new()),
                mode,
                handle: None,
            },
        );
        Ok(())
    }

    /// Spawns one worker thread per `Push` subscriber and blocks until each
    /// has signaled readiness. Idempotent: a second call on an already
    /// running bus is a no-op. Returns [`EngineError::NoSubscribers`] if no
    /// subscriber was registered first, without touching `running`.
    ///
    /// With the `cpu-affinity` feature enabled, each worker pins itself to
    /// one core, round-robin over `core_affinity::get_core_ids()`. This is
    /// a convenience hook, not the isolated-core/NUMA placement a deployment
    /// with strict latency requirements would want — that tuning lives
    /// outside this crate.
    pub fn start(this: &Arc<Self>) -> Result<(), EngineError> {
        if this.running.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut subs = this.subs.lock();
        if subs.is_empty() {
            return Err(EngineError::NoSubscribers);
        }

        if this.running.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let push_count = subs.values().filter(|e| e.mode == SubscriberMode::Push).count();
        let ready = Arc::new(TickBarrier::new(push_count));

        for (id, entry) in subs.iter_mut() {
            if entry.mode != SubscriberMode::Push {
                continue;
            }

            let bus = this.clone();
            let queue = entry.queue.clone();
            let listener = entry.listener.clone();
            let ready = ready.clone();
            let name = format!("bus-sub-{id}");

            #[cfg(feature = "cpu-affinity")]
            let core_id = core_affinity::get_core_ids().and_then(|ids| ids.into_iter().nth(*id as usize % ids.len().max(1)));

            let handle = thread::Builder::new()
                .name(name)
                .spawn(move || {
                    #[cfg(feature = "cpu-affinity")]
                    if let Some(core_id) = core_id {
                        core_affinity::set_for_current(core_id);
                    }

                    ready.complete();
                    Self::run_subscriber(&bus, queue.as_ref(), listener.as_ref());
                })
                .expect("failed to spawn event bus subscriber thread");

            entry.handle = Some(handle);
        }
        drop(subs);

        ready.wait();
        Ok(())
    }

    fn run_subscriber(
        bus: &Arc<Self>,
        queue: &SpscQueue<Policy::QueueItem, QUEUE_SIZE>,
        listener: &(dyn DispatchTarget<Event> + Send + Sync),
    ) {
        while bus.running.load(Ordering::Acquire) {
            match queue.pop() {
                Some(item) => Self::dispatch_isolated(item, listener),
                None => thread::yield_now(),
            }
        }

        if bus.drain_on_stop.load(Ordering::Acquire) {
            while let Some(item) = queue.pop() {
                Self::dispatch_isolated(item, listener);
            }
        } else {
            queue.clear();
        }
    }

    /// Runs one dispatch behind `catch_unwind` so a panicking listener
    /// callback cannot take down the worker thread (and, with it, every
    /// other subscriber sharing this process).
    fn dispatch_isolated(item: Policy::QueueItem, listener: &(dyn DispatchTarget<Event> + Send + Sync)) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            Policy::dispatch(item, listener);
        }));
        if let Err(cause) = result {
            let message = cause
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| cause.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(%message, "event bus subscriber callback panicked");
        }
    }

    /// Stamps `event` with the next tick sequence number and enqueues it for
    /// every subscriber. Under `SyncPolicy`, blocks until every `Push`
    /// subscriber has finished processing it. A no-op before `start()`.
    pub fn publish(&self, mut event: Event) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }

        let seq = self.tick_counter.fetch_add(1, Ordering::Relaxed);
        event.set_tick_sequence(seq);

        let subs = self.subs.lock();
        let push_count = subs.values().filter(|e| e.mode == SubscriberMode::Push).count();
        let barrier = Arc::new(TickBarrier::new(push_count));

        for entry in subs.values() {
            // Every queue item carries the barrier, push or pull alike — only
            // push workers ever call `Policy::dispatch` (and so only they can
            // complete it via `TickGuard`), so a pull subscriber holding a
            // reference to it and never completing it is harmless; `wait()`
            // only counts down from `push_count`.
            let item_barrier = Some(barrier.clone());
            loop {
                let item = Policy::make_item(event.clone(), item_barrier.clone());
                if entry.queue.push(item) {
                    break;
                }
                thread::yield_now();
            }
        }
        drop(subs);

        Policy::after_publish(&barrier);
    }

    /// Returns a clone of a `Pull` subscriber's queue handle, or `None` if
    /// `id` is unknown or not registered as `Pull`.
    pub fn get_queue(&self, id: SubscriberId) -> Option<Arc<SpscQueue<Policy::QueueItem, QUEUE_SIZE>>> {
        self.subs
            .lock()
            .get(&id)
            .filter(|e| e.mode == SubscriberMode::Pull)
            .map(|e| e.queue.clone())
    }

    /// The next tick sequence number [`EventBus::publish`] will assign.
    pub fn current_tick_id(&self) -> u64 {
        self.tick_counter.load(Ordering::Relaxed)
    }

    /// Signals every worker thread to stop and joins them. Idempotent.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        let mut subs = self.subs.lock();
        for entry in subs.values_mut() {
            if let Some(handle) = entry.handle.take() {
                if handle.join().is_err() {
                    error!("event bus subscriber thread panicked during shutdown");
                }
            }
        }
    }
}

impl<Event, Policy, const QUEUE_SIZE: usize> Drop for EventBus<Event, Policy, QUEUE_SIZE>
where
    Event: Clone + Send + TickStamped + 'static,
    Policy: DispatchPolicy<Event>,
{
    fn drop(&mut self) {
        self.stop();
    }
}
