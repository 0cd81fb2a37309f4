//! Wire-adjacent data model shared by the market-data and order-execution
//! buses: trades, candles, orders, and order lifecycle events.

use crate::bus::TickStamped;
use crate::candle::Candle;
use crate::decimal::{Price, Quantity};
use crate::time::TimePoint;
use serde::{Deserialize, Serialize};

/// Process-wide identifier assigned by the [`crate::registry::SymbolRegistry`].
pub type SymbolId = u32;
/// Exchange- or strategy-assigned order identifier.
pub type OrderId = u64;

/// Spot/future/option instrument classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Spot instrument.
    Spot,
    /// Futures contract.
    Future,
    /// Option contract.
    Option,
}

/// Call/put classification for option instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Buy / bid side.
    Buy,
    /// Sell / ask side.
    Sell,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Resting limit order.
    Limit,
    /// Immediately-marketable order.
    Market,
}

/// A trade print, passed by value (never pooled).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Registry-assigned symbol id.
    pub symbol: SymbolId,
    /// Instrument classification.
    pub instrument: InstrumentType,
    /// Trade price.
    pub price: Price,
    /// Trade quantity.
    pub quantity: Quantity,
    /// `true` if the aggressor was a buyer.
    pub is_buy: bool,
    /// Exchange-reported trade timestamp, nanoseconds since Unix epoch.
    pub exchange_ts_ns: i64,
    /// Monotonic per-bus serial number, stamped by [`crate::bus::EventBus::publish`].
    pub tick_sequence: u64,
}

/// A finalized or in-flight OHLCV bucket for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleEvent {
    /// Registry-assigned symbol id.
    pub symbol: SymbolId,
    /// Instrument classification.
    pub instrument: InstrumentType,
    /// The finalized candle.
    pub candle: Candle,
    /// Monotonic per-bus serial number, stamped by [`crate::bus::EventBus::publish`].
    pub tick_sequence: u64,
}

/// An order's observable lifecycle state, updated in place as fills and
/// lifecycle events arrive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Strategy- or exchange-assigned order id.
    pub id: OrderId,
    /// Buy or sell.
    pub side: Side,
    /// Limit price (ignored for market orders, but still carried).
    pub price: Price,
    /// Total order quantity.
    pub quantity: Quantity,
    /// Limit or market.
    pub order_type: OrderType,
    /// Registry-assigned symbol id.
    pub symbol: SymbolId,
    /// Cumulative filled quantity.
    pub filled_quantity: Quantity,
    /// Local creation timestamp.
    pub created_at: TimePoint,
    /// Exchange-reported acceptance timestamp, if known.
    pub exchange_ts: Option<TimePoint>,
    /// Timestamp of the most recent lifecycle update, if any.
    pub last_updated: Option<TimePoint>,
    /// Expiration deadline, if the order carries a time-in-force limit.
    pub expires_after: Option<TimePoint>,
}

impl Order {
    /// Creates a brand-new order with zero fills and no lifecycle
    /// timestamps set beyond `created_at`.
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_type: OrderType,
        symbol: SymbolId,
        created_at: TimePoint,
    ) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            order_type,
            symbol,
            filled_quantity: Quantity::from_raw(0),
            created_at,
            exchange_ts: None,
            last_updated: None,
            expires_after: None,
        }
    }
}

/// The kind of order lifecycle transition carried by an [`OrderEvent`].
///
/// `Submitted` and `Accepted` are independent events: spec.md §9 notes the
/// original implementation's dispatch switch falls through from `Submitted`
/// into `Accepted`, which is treated here as unintentional — each variant
/// dispatches to exactly one listener callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEventType {
    /// The order was submitted to the exchange.
    Submitted,
    /// The exchange acknowledged the order.
    Accepted,
    /// The order received a partial fill.
    PartiallyFilled,
    /// The order is fully filled.
    Filled,
    /// The order was canceled.
    Canceled,
    /// The order expired (time-in-force elapsed).
    Expired,
    /// The exchange rejected the order.
    Rejected,
    /// The order was replaced by a new one.
    Replaced,
}

/// An order lifecycle event, published on the order-execution bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// The lifecycle transition this event represents.
    pub event_type: OrderEventType,
    /// The order this event concerns.
    pub order: Order,
    /// The replacement order, populated only for `Replaced`.
    pub new_order: Order,
    /// The quantity filled by this event, populated only for `PartiallyFilled`.
    pub fill_qty: Quantity,
    /// The exchange's stated rejection reason, populated only for `Rejected`.
    pub reason: Option<String>,
    /// Monotonic per-bus serial number, stamped by [`crate::bus::EventBus::publish`].
    pub tick_sequence: u64,
}

impl TickStamped for TradeEvent {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}

impl TickStamped for CandleEvent {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}

impl TickStamped for OrderEvent {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}
