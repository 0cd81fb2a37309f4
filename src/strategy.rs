//! The outbound market-data subscriber contract.
//!
//! A strategy (or any other market-data consumer — a storage sink, a risk
//! manager) implements [`MarketDataSubscriber`] once and gets wired into the
//! trade, book-update, and candle buses automatically through the blanket
//! [`crate::bus::DispatchTarget`] impls below, rather than hand-writing one
//! adapter per bus the way a hand-rolled vtable-per-role design would.

use crate::book::BookUpdateEvent;
use crate::bus::{DispatchTarget, SubscriberId, SubscriberMode};
use crate::events::{CandleEvent, TradeEvent};

/// A subscriber to market-data events: trades, book updates, and candles.
///
/// Every callback has a no-op default so an implementor only overrides the
/// events it actually cares about.
pub trait MarketDataSubscriber: Send + Sync {
    /// This subscriber's identity, unique across whichever buses it joins.
    fn id(&self) -> SubscriberId;

    /// Whether the bus should drive this subscriber from a worker thread
    /// (`Push`) or leave it to pull from its own queue (`Pull`).
    fn mode(&self) -> SubscriberMode;

    /// Called once before the owning bus(es) start dispatching.
    fn start(&self) {}

    /// Called once after the owning bus(es) stop dispatching.
    fn stop(&self) {}

    /// Called for each trade print.
    fn on_trade(&self, _event: &TradeEvent) {}

    /// Called for each book snapshot or delta.
    fn on_book_update(&self, _event: &BookUpdateEvent) {}

    /// Called for each finalized or in-flight candle.
    fn on_candle(&self, _event: &CandleEvent) {}
}

impl<T: MarketDataSubscriber + ?Sized> DispatchTarget<TradeEvent> for T {
    fn dispatch(&self, event: &TradeEvent) {
        self.on_trade(event);
    }
}

impl<T: MarketDataSubscriber + ?Sized> DispatchTarget<BookUpdateEvent> for T {
    fn dispatch(&self, event: &BookUpdateEvent) {
        self.on_book_update(event);
    }
}

impl<T: MarketDataSubscriber + ?Sized> DispatchTarget<CandleEvent> for T {
    fn dispatch(&self, event: &CandleEvent) {
        self.on_candle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Price, Quantity};
    use crate::events::InstrumentType;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder {
        trades: Mutex<Vec<Price>>,
    }

    impl MarketDataSubscriber for Recorder {
        fn id(&self) -> SubscriberId {
            1
        }
        fn mode(&self) -> SubscriberMode {
            SubscriberMode::Push
        }
        fn on_trade(&self, event: &TradeEvent) {
            self.trades.lock().push(event.price);
        }
    }

    #[test]
    fn blanket_dispatch_target_routes_trades_to_on_trade() {
        let recorder = Arc::new(Recorder { trades: Mutex::new(Vec::new()) });
        let listener: Arc<dyn DispatchTarget<TradeEvent> + Send + Sync> = recorder.clone();

        listener.dispatch(&TradeEvent {
            symbol: 1,
            instrument: InstrumentType::Spot,
            price: Price::from_double(100.0),
            quantity: Quantity::from_double(1.0),
            is_buy: true,
            exchange_ts_ns: 0,
            tick_sequence: 0,
        });

        assert_eq!(recorder.trades.lock().as_slice(), &[Price::from_double(100.0)]);
    }
}
