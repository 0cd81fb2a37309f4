//! Per-symbol OHLCV candle aggregation from a stream of trades.

use crate::decimal::{Price, Volume, mul_price_quantity};
use crate::events::{CandleEvent, InstrumentType, SymbolId, TradeEvent};
use crate::time::TimePoint;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// A finalized or in-progress OHLCV bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Price of the first trade in the bucket.
    pub open: Price,
    /// Highest trade price seen in the bucket.
    pub high: Price,
    /// Lowest trade price seen in the bucket.
    pub low: Price,
    /// Price of the most recent trade in the bucket.
    pub close: Price,
    /// Sum of `price * quantity` over every trade in the bucket.
    pub volume: Volume,
    /// Start of the aligned interval this bucket covers.
    pub start_time: TimePoint,
    /// End of the aligned interval (`start_time + interval`, refreshed on
    /// every trade so an in-progress candle always reports its eventual end).
    pub end_time: TimePoint,
}

impl Candle {
    fn seed(start_time: TimePoint, price: Price, volume: Volume) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
            start_time,
            end_time: start_time,
        }
    }
}

struct PartialCandle {
    candle: Candle,
    instrument: InstrumentType,
    initialized: bool,
}

impl Default for PartialCandle {
    fn default() -> Self {
        Self {
            candle: Candle::seed(TimePoint::from_raw_nanos(0), Price::from_raw(0), Volume::from_raw(0)),
            instrument: InstrumentType::Spot,
            initialized: false,
        }
    }
}

/// Aggregates trades into fixed-width OHLCV candles, one independent bucket
/// per symbol, emitting a [`CandleEvent`] through `emit` each time a bucket
/// rolls over (and once more for every open bucket on [`CandleAggregator::stop`]).
pub struct CandleAggregator {
    interval: Duration,
    candles: Vec<Option<PartialCandle>>,
}

impl CandleAggregator {
    /// Creates an aggregator bucketing trades into `interval`-wide windows
    /// aligned to the monotonic clock's epoch.
    pub fn new(interval: Duration) -> Self {
        Self { interval, candles: Vec::new() }
    }

    /// Clears all in-progress state. Call once before the first trade.
    pub fn start(&mut self) {
        self.candles.clear();
    }

    /// Finalizes every open bucket, emitting one [`CandleEvent`] per symbol
    /// that has accumulated at least one trade, then clears all state.
    pub fn stop<F: FnMut(CandleEvent)>(&mut self, mut emit: F) {
        for (id, slot) in self.candles.iter_mut().enumerate() {
            if let Some(partial) = slot {
                if partial.initialized {
                    partial.candle.end_time =
                        TimePoint::from_raw_nanos(partial.candle.start_time.raw_nanos() + self.interval.as_nanos() as i64);
                    emit(CandleEvent {
                        symbol: id as SymbolId,
                        instrument: partial.instrument,
                        candle: partial.candle,
                        tick_sequence: 0,
                    });
                }
            }
        }
        self.candles.clear();
    }

    /// Folds one trade into its symbol's bucket, emitting a [`CandleEvent`]
    /// through `emit` whenever the trade's aligned interval differs from the
    /// bucket's current one (i.e. the previous bucket just closed).
    pub fn on_trade<F: FnMut(CandleEvent)>(&mut self, trade: &TradeEvent, mut emit: F) {
        let id = trade.symbol as usize;
        if id >= self.candles.len() {
            self.candles.resize_with(id + 1, || None);
        }

        let slot = &mut self.candles[id];
        if slot.is_none() {
            *slot = Some(PartialCandle::default());
        }
        let partial = slot.as_mut().unwrap();

        let aligned = self.align_to_interval(TimePoint::from_raw_nanos(trade.exchange_ts_ns));
        let trade_volume = mul_price_quantity(trade.price, trade.quantity);

        if !partial.initialized || partial.candle.start_time != aligned {
            if partial.initialized {
                partial.candle.end_time =
                    TimePoint::from_raw_nanos(partial.candle.start_time.raw_nanos() + self.interval.as_nanos() as i64);
                emit(CandleEvent {
                    symbol: trade.symbol,
                    instrument: partial.instrument,
                    candle: partial.candle,
                    tick_sequence: 0,
                });
            }

            partial.candle = Candle::seed(aligned, trade.price, trade_volume);
            partial.candle.end_time =
                TimePoint::from_raw_nanos(aligned.raw_nanos() + self.interval.as_nanos() as i64);
            partial.instrument = trade.instrument;
            partial.initialized = true;
            trace!(symbol = trade.symbol, "opened new candle bucket");
            return;
        }

        let c = &mut partial.candle;
        if trade.price > c.high {
            c.high = trade.price;
        }
        if trade.price < c.low {
            c.low = trade.price;
        }
        c.close = trade.price;
        c.volume = c.volume + trade_volume;
        c.end_time = TimePoint::from_raw_nanos(c.start_time.raw_nanos() + self.interval.as_nanos() as i64);
    }

    fn align_to_interval(&self, tp: TimePoint) -> TimePoint {
        let interval_ns = self.interval.as_nanos() as i64;
        if interval_ns == 0 {
            return tp;
        }
        let snapped = tp.raw_nanos().div_euclid(interval_ns) * interval_ns;
        TimePoint::from_raw_nanos(snapped)
    }
}
