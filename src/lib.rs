//! # Tradecore
//!
//! Core event bus, order book, and candle aggregation engine for building
//! low-latency market-data and order-execution systems.
//!
//! This crate is deliberately narrow: it owns the concurrency fabric (a
//! generic multi-subscriber event bus), the per-symbol order book engines,
//! the trade-to-candle aggregator, and the allocation-free plumbing
//! (fixed-point decimals, an SPSC ring queue, and an intrusive ref-counted
//! object pool) that the hot paths above are built from.
//!
//! Exchange connectors, strategies, risk/kill-switch logic, and persistence
//! sinks are external collaborators. This crate defines the narrow traits
//! they implement ([`connector::Connector`], [`strategy::MarketDataSubscriber`],
//! [`execution::OrderExecutionListener`]) but does not implement any of them.
//!
//! ## Layout
//!
//! - [`decimal`] — fixed-point `Price`/`Quantity`/`Volume` arithmetic.
//! - [`concurrency`] — SPSC queue, intrusive pool, tick barrier.
//! - [`bus`] — the generic sync/async event bus.
//! - [`book`] — the N-level array book and the windowed ring-buffer book.
//! - [`candle`] — per-symbol OHLCV aggregation.
//! - [`registry`] — the symbol registry.
//! - [`tracker`] — the order lifecycle tracker.
//! - [`events`] — the wire-adjacent data model shared across buses.
//! - [`config`], [`time`], [`error`] — ambient configuration, clocks, errors.

pub mod book;
pub mod bus;
pub mod candle;
pub mod concurrency;
pub mod config;
pub mod connector;
pub mod decimal;
pub mod error;
pub mod events;
pub mod execution;
pub mod registry;
pub mod strategy;
pub mod time;
pub mod tracker;

pub mod prelude {
    //! Convenience re-exports of the most commonly used types.

    pub use crate::book::nlevel::NLevelOrderBook;
    pub use crate::book::windowed::WindowedOrderBook;
    pub use crate::book::{BookLevel, BookUpdate, BookUpdateEvent, BookUpdateHandle, BookUpdateType};
    pub use crate::bus::{AsyncPolicy, DispatchPolicy, DispatchTarget, EventBus, SubscriberId, SubscriberMode, SyncPolicy, TickStamped};
    pub use crate::candle::{Candle, CandleAggregator};
    pub use crate::concurrency::barrier::TickBarrier;
    pub use crate::concurrency::pool::{Handle, Pool, Poolable};
    pub use crate::concurrency::spsc::SpscQueue;
    pub use crate::config::{EngineConfig, ExchangeConfig, KillSwitchConfig, LogLevel, SymbolConfig};
    pub use crate::connector::{BookUpdateCallback, Connector, TradeCallback};
    pub use crate::decimal::{Decimal, Price, Quantity, Volume};
    pub use crate::error::{ArithmeticError, EngineError};
    pub use crate::events::{CandleEvent, Order, OrderEvent, OrderEventType, TradeEvent};
    pub use crate::execution::OrderExecutionListener;
    pub use crate::registry::{SymbolInfo, SymbolRegistry};
    pub use crate::strategy::MarketDataSubscriber;
    pub use crate::tracker::{OrderState, OrderTracker};
}
