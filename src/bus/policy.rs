//! Sync and async dispatch policies.
//!
//! A policy decides two things: what a queued item looks like (plain event,
//! or event paired with a completion token) and how a worker thread turns a
//! dequeued item back into a callback invocation.

use super::subscriber::DispatchTarget;
use crate::concurrency::barrier::{TickBarrier, TickGuard};
use std::sync::Arc;

/// Parameterizes an [`super::event_bus::EventBus`] over how it queues and
/// dispatches events.
pub trait DispatchPolicy<Event>: Send + Sync + 'static {
    /// The value actually stored in each subscriber's queue.
    type QueueItem: Send;

    /// Builds a queue item from a published event and, for policies that
    /// need one, a per-publish completion barrier.
    fn make_item(event: Event, barrier: Option<Arc<TickBarrier>>) -> Self::QueueItem;

    /// Turns a dequeued item back into a listener callback.
    fn dispatch(item: Self::QueueItem, listener: &dyn DispatchTarget<Event>);

    /// Called by [`super::event_bus::EventBus::publish`] once every
    /// subscriber's item has been enqueued. `SyncPolicy` blocks here until
    /// the barrier releases; `AsyncPolicy`'s default is a no-op.
    fn after_publish(_barrier: &Arc<TickBarrier>) {}
}

/// Publisher blocks until every push-mode subscriber has finished
/// processing the tick it just published, giving a total order across
/// subscribers for each tick (and across ticks, since the next publish
/// cannot start enqueuing until this one's barrier releases).
pub struct SyncPolicy;

impl<Event: Send + 'static> DispatchPolicy<Event> for SyncPolicy {
    type QueueItem = (Event, Arc<TickBarrier>);

    fn make_item(event: Event, barrier: Option<Arc<TickBarrier>>) -> Self::QueueItem {
        (event, barrier.expect("SyncPolicy always supplies a tick barrier"))
    }

    fn dispatch(item: Self::QueueItem, listener: &dyn DispatchTarget<Event>) {
        let (event, barrier) = item;
        let _guard = TickGuard::new(&barrier);
        listener.dispatch(&event);
    }

    fn after_publish(barrier: &Arc<TickBarrier>) {
        barrier.wait();
    }
}

/// Publisher never blocks; each subscriber drains its queue at its own pace.
pub struct AsyncPolicy;

impl<Event: Send + 'static> DispatchPolicy<Event> for AsyncPolicy {
    type QueueItem = Event;

    fn make_item(event: Event, _barrier: Option<Arc<TickBarrier>>) -> Self::QueueItem {
        event
    }

    fn dispatch(item: Self::QueueItem, listener: &dyn DispatchTarget<Event>) {
        listener.dispatch(&item);
    }
}
