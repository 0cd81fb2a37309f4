//! Shared book-update data model, consumed by both order book variants.

use crate::bus::TickStamped;
use crate::concurrency::pool::{Handle, Poolable};
use crate::decimal::{Price, Quantity};
use crate::events::{InstrumentType, OptionType, SymbolId};
use crate::time::TimePoint;

/// Whether a [`BookUpdate`] replaces the whole book or patches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookUpdateType {
    /// Full replacement of every level.
    Snapshot,
    /// Incremental patch; a zero quantity deletes that level.
    Delta,
}

/// One `(price, quantity)` level in a [`BookUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BookLevel {
    /// Level price.
    pub price: Price,
    /// Level quantity. Zero in a `Delta` update means "delete this level".
    pub quantity: Quantity,
}

impl BookLevel {
    /// Builds a level from a price and quantity.
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// A book snapshot or delta for one symbol, reused from a [`crate::concurrency::pool::Pool`].
///
/// Bids and asks carry no ordering requirement — any order is permitted
/// within a single update.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUpdate {
    /// Registry-assigned symbol id.
    pub symbol: SymbolId,
    /// Instrument classification.
    pub instrument: InstrumentType,
    /// Snapshot or delta.
    pub update_type: BookUpdateType,
    /// Bid-side levels, in arbitrary order.
    pub bids: Vec<BookLevel>,
    /// Ask-side levels, in arbitrary order.
    pub asks: Vec<BookLevel>,
    /// Exchange-reported timestamp, nanoseconds since Unix epoch.
    pub exchange_ts_ns: i64,
    /// Local receive timestamp, nanoseconds since Unix epoch.
    pub system_ts_ns: i64,
    /// Strike price, for options.
    pub strike: Option<Price>,
    /// Expiry, for futures and options.
    pub expiry: Option<TimePoint>,
    /// Call/put, for options.
    pub option_type: Option<OptionType>,
}

impl Default for BookUpdate {
    fn default() -> Self {
        Self {
            symbol: 0,
            instrument: InstrumentType::Spot,
            update_type: BookUpdateType::Delta,
            bids: Vec::new(),
            asks: Vec::new(),
            exchange_ts_ns: 0,
            system_ts_ns: 0,
            strike: None,
            expiry: None,
            option_type: None,
        }
    }
}

impl Poolable for BookUpdate {
    fn clear(&mut self) {
        self.symbol = 0;
        self.instrument = InstrumentType::Spot;
        self.update_type = BookUpdateType::Delta;
        self.bids.clear();
        self.asks.clear();
        self.exchange_ts_ns = 0;
        self.system_ts_ns = 0;
        self.strike = None;
        self.expiry = None;
        self.option_type = None;
    }
}

/// Pool capacity backing [`BookUpdateHandle`]. Sized for several in-flight
/// updates per symbol across the market-data bus's subscriber queues.
pub const BOOK_UPDATE_POOL_CAPACITY: usize = 4096;

/// A pooled [`BookUpdate`], shared by reference count rather than cloned
/// level-by-level on every publish.
pub type BookUpdateHandle = Handle<BookUpdate, BOOK_UPDATE_POOL_CAPACITY>;

/// The market-data bus's book-update event: a pooled handle plus the
/// sequence number the bus stamps on publish.
#[derive(Clone)]
pub struct BookUpdateEvent {
    /// The pooled, ref-counted update payload.
    pub update: BookUpdateHandle,
    /// Monotonic per-bus serial number, stamped by [`crate::bus::EventBus::publish`].
    pub tick_sequence: u64,
}

impl TickStamped for BookUpdateEvent {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}
