//! The generic multi-subscriber event bus: one bus instance per event type
//! (market data trades, book updates, candles, order lifecycle), each
//! parameterized by a [`policy::DispatchPolicy`] that decides whether
//! publishing blocks for in-order subscriber completion or fires and
//! forgets.

pub mod event_bus;
pub mod policy;
pub mod subscriber;

pub use event_bus::{EventBus, DEFAULT_QUEUE_SIZE};
pub use policy::{AsyncPolicy, DispatchPolicy, SyncPolicy};
pub use subscriber::{DispatchTarget, SubscriberId, SubscriberMode, TickStamped};
