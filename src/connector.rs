//! The inbound exchange-connector contract.
//!
//! A connector owns a feed's wire protocol and translates it into
//! [`TradeEvent`]/[`BookUpdateEvent`] callbacks; the engine wires those
//! callbacks to whichever buses' `publish` methods are appropriate. This
//! crate defines the trait only — no connector implementation ships here
//! (spec.md §1: exchange connectors are an external collaborator's concern).

use crate::book::BookUpdateEvent;
use crate::error::EngineError;
use crate::events::TradeEvent;

/// Called by a [`Connector`] for each trade print it decodes.
pub type TradeCallback = Box<dyn Fn(TradeEvent) + Send + Sync>;
/// Called by a [`Connector`] for each book snapshot or delta it decodes.
pub type BookUpdateCallback = Box<dyn Fn(BookUpdateEvent) + Send + Sync>;

/// An inbound market-data feed for one exchange.
///
/// Implementations MUST populate `symbol`, `exchange_ts_ns`, `instrument`,
/// and — for book updates — `update_type` on every event they emit; a delta
/// MAY include zero-quantity levels to signal deletion.
pub trait Connector: Send + Sync {
    /// This connector's exchange identity, e.g. `"binance"`.
    fn exchange_id(&self) -> &str;

    /// Registers the callbacks the connector invokes as events arrive.
    /// Must be called before [`Connector::start`].
    fn set_callbacks(&mut self, on_book_update: BookUpdateCallback, on_trade: TradeCallback);

    /// Connects and begins delivering events to the registered callbacks.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Disconnects. Idempotent.
    fn stop(&mut self);
}
