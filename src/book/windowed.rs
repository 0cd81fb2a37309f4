//! A ring-buffered one-sided book depth, and the windowed order book built
//! from a pair of them.
//!
//! Unlike [`crate::book::nlevel::NLevelOrderBook`], which re-centers by
//! moving a base index over a fixed array, [`BookSide`] keeps the array in
//! place and rotates a logical `offset` — an amortized O(1) shift at the
//! cost of a modulo on every access.

use crate::book::types::{BookLevel, BookUpdate, BookUpdateType};
use crate::decimal::{Price, Quantity};
use parking_lot::Mutex;

/// Which side of the book a [`BookSide`] tracks; determines the direction
/// "best" scans in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Bid side: best is the maximum non-zero index.
    Bid,
    /// Ask side: best is the minimum non-zero index.
    Ask,
}

/// A ring buffer of `window_size` quantities for one side of the book.
pub struct BookSide {
    qty: Vec<Quantity>,
    offset: usize,
    window_size: usize,
    side: Side,
    best_index: Option<usize>,
}

impl BookSide {
    /// Creates an all-zero side of `window_size` slots.
    pub fn new(window_size: usize, side: Side) -> Self {
        Self {
            qty: vec![Quantity::from_raw(0); window_size],
            offset: 0,
            window_size,
            side,
            best_index: None,
        }
    }

    fn ring(&self, index: usize) -> usize {
        (index + self.offset) % self.window_size
    }

    /// Writes the quantity at logical `index`, updating the cached best
    /// index monotonically (or invalidating it if this write zeroes the
    /// current best).
    pub fn set_level(&mut self, index: usize, qty: Quantity) {
        let slot = self.ring(index);
        self.qty[slot] = qty;

        if qty.raw() > 0 {
            match self.best_index {
                None => self.best_index = Some(index),
                Some(best) => match self.side {
                    Side::Bid => {
                        if index > best {
                            self.best_index = Some(index);
                        }
                    }
                    Side::Ask => {
                        if index < best {
                            self.best_index = Some(index);
                        }
                    }
                },
            }
        } else if self.best_index == Some(index) {
            self.best_index = None;
        }
    }

    /// Reads the quantity at logical `index`.
    pub fn get_level(&self, index: usize) -> Quantity {
        self.qty[self.ring(index)]
    }

    /// Rotates the logical window by `levels` (may be negative). Clears the
    /// side entirely if `|levels| >= window_size`.
    pub fn shift(&mut self, levels: i64) {
        if levels.unsigned_abs() as usize >= self.window_size {
            self.clear();
            self.offset = 0;
            return;
        }
        let size = self.window_size as i64;
        self.offset = ((self.offset as i64 + levels + size) % size) as usize;
        self.best_index = None;
    }

    /// Zeroes every slot and invalidates the best-index cache.
    pub fn clear(&mut self) {
        self.qty.iter_mut().for_each(|q| *q = Quantity::from_raw(0));
        self.best_index = None;
    }

    /// Returns the cached best logical index, rescanning the ring if the
    /// cache was invalidated.
    pub fn find_best(&mut self) -> Option<usize> {
        if self.best_index.is_some() {
            return self.best_index;
        }

        let found = match self.side {
            Side::Bid => (0..self.window_size).rev().find(|&i| self.qty[self.ring(i)].raw() > 0),
            Side::Ask => (0..self.window_size).find(|&i| self.qty[self.ring(i)].raw() > 0),
        };
        self.best_index = found;
        found
    }
}

struct Inner {
    center_price: Price,
    base_price: Price,
    bids: BookSide,
    asks: BookSide,
}

/// An order book variant that tracks a window of `window_size` ticks
/// centered on the last observed mid price, sized from an expected price
/// deviation rather than a fixed level count.
///
/// All mutating and reading operations take `&self` and serialize through
/// an internal lock, so (unlike [`crate::book::nlevel::NLevelOrderBook`])
/// readers on other threads may safely call `best_bid`/`best_ask` while a
/// dispatch thread applies updates.
pub struct WindowedOrderBook {
    tick_size: Price,
    window_size: usize,
    half_window_size: usize,
    inner: Mutex<Inner>,
}

impl WindowedOrderBook {
    /// Creates a book sized so the window comfortably covers
    /// `±expected_deviation` around any future center price.
    pub fn new(tick_size: Price, expected_deviation: Price) -> Self {
        let window_size = ((expected_deviation.to_double() * 2.0) / tick_size.to_double()).ceil() as usize;
        let window_size = window_size.max(1);
        Self {
            tick_size,
            window_size,
            half_window_size: window_size / 2,
            inner: Mutex::new(Inner {
                center_price: Price::from_raw(0),
                base_price: Price::from_raw(0),
                bids: BookSide::new(window_size, Side::Bid),
                asks: BookSide::new(window_size, Side::Ask),
            }),
        }
    }

    /// The window's current center price (zero before the first update).
    pub fn center_price(&self) -> Price {
        self.inner.lock().center_price
    }

    fn is_price_in_window(&self, inner: &Inner, price: Price) -> bool {
        let offset = price.raw() - inner.base_price.raw();
        offset >= 0 && offset < self.tick_size.raw() * self.window_size as i64
    }

    fn in_window_index(&self, inner: &Inner, price: Price) -> Option<usize> {
        let offset = price.raw() - inner.base_price.raw();
        if offset >= 0 && offset < self.tick_size.raw() * self.window_size as i64 {
            Some((offset / self.tick_size.raw()) as usize)
        } else {
            None
        }
    }

    fn index_to_price(&self, inner: &Inner, index: usize) -> Price {
        Price::from_raw(inner.base_price.raw() + index as i64 * self.tick_size.raw())
    }

    fn shift_window(&self, inner: &mut Inner, new_price: Price) {
        let new_base_raw = {
            let shifted = new_price.to_double() - self.tick_size.to_double() * self.half_window_size as f64;
            (shifted / self.tick_size.to_double()).round() as i64 * self.tick_size.raw()
        };

        let shift = if self.tick_size.raw() == 0 {
            0
        } else {
            ((new_base_raw - inner.base_price.raw()) as f64 / self.tick_size.raw() as f64).round() as i64
        };

        if inner.center_price.raw() == 0 || shift.unsigned_abs() as usize >= self.window_size {
            inner.bids.clear();
            inner.asks.clear();
        } else if shift != 0 {
            inner.bids.shift(shift);
            inner.asks.shift(shift);
        }

        inner.base_price = Price::from_raw(new_base_raw);
        inner.center_price = new_price;
    }

    /// Applies a snapshot or delta, re-centering the window first if the
    /// update's price range has drifted outside it.
    pub fn apply_update(&self, update: &BookUpdate) {
        let mut inner = self.inner.lock();

        let mut min_price = i64::MAX;
        let mut max_price = i64::MIN;
        for level in update.bids.iter().chain(update.asks.iter()) {
            min_price = min_price.min(level.price.raw());
            max_price = max_price.max(level.price.raw());
        }
        let has_levels = min_price <= max_price;

        if inner.center_price.raw() == 0 || update.update_type == BookUpdateType::Snapshot {
            if has_levels {
                let mid = Price::from_raw((min_price + max_price) / 2);
                self.shift_window(&mut inner, mid);
            }
        } else {
            let needs_shift = update
                .bids
                .iter()
                .chain(update.asks.iter())
                .any(|level| !self.is_price_in_window(&inner, level.price));
            if needs_shift && has_levels {
                let mid = Price::from_raw((min_price + max_price) / 2);
                self.shift_window(&mut inner, mid);
            }
        }

        if update.update_type == BookUpdateType::Snapshot {
            let mut bids_touched = vec![false; self.window_size];
            for level in &update.bids {
                if let Some(idx) = self.in_window_index(&inner, level.price) {
                    bids_touched[idx] = true;
                    inner.bids.set_level(idx, level.quantity);
                }
            }
            for (i, touched) in bids_touched.iter().enumerate() {
                if !touched {
                    inner.bids.set_level(i, Quantity::from_raw(0));
                }
            }

            let mut asks_touched = vec![false; self.window_size];
            for level in &update.asks {
                if let Some(idx) = self.in_window_index(&inner, level.price) {
                    asks_touched[idx] = true;
                    inner.asks.set_level(idx, level.quantity);
                }
            }
            for (i, touched) in asks_touched.iter().enumerate() {
                if !touched {
                    inner.asks.set_level(i, Quantity::from_raw(0));
                }
            }
            return;
        }

        for level in &update.bids {
            if let Some(idx) = self.in_window_index(&inner, level.price) {
                inner.bids.set_level(idx, level.quantity);
            }
        }
        for level in &update.asks {
            if let Some(idx) = self.in_window_index(&inner, level.price) {
                inner.asks.set_level(idx, level.quantity);
            }
        }
    }

    /// Quantity resting at `price` on the bid side, zero if out of window.
    pub fn bid_at_price(&self, price: Price) -> Quantity {
        let inner = self.inner.lock();
        if !self.is_price_in_window(&inner, price) {
            return Quantity::from_raw(0);
        }
        let idx = ((price.raw() - inner.base_price.raw()) / self.tick_size.raw()) as usize;
        inner.bids.get_level(idx)
    }

    /// Quantity resting at `price` on the ask side, zero if out of window.
    pub fn ask_at_price(&self, price: Price) -> Quantity {
        let inner = self.inner.lock();
        if !self.is_price_in_window(&inner, price) {
            return Quantity::from_raw(0);
        }
        let idx = ((price.raw() - inner.base_price.raw()) / self.tick_size.raw()) as usize;
        inner.asks.get_level(idx)
    }

    /// The best (maximum-price) non-zero bid, if any.
    pub fn best_bid(&self) -> Option<Price> {
        let mut inner = self.inner.lock();
        inner.bids.find_best().map(|idx| self.index_to_price(&inner, idx))
    }

    /// The best (minimum-price) non-zero ask, if any.
    pub fn best_ask(&self) -> Option<Price> {
        let mut inner = self.inner.lock();
        inner.asks.find_best().map(|idx| self.index_to_price(&inner, idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_side_best_is_monotonic_per_side() {
        let mut bids = BookSide::new(16, Side::Bid);
        bids.set_level(3, Quantity::from_double(1.0));
        bids.set_level(7, Quantity::from_double(1.0));
        assert_eq!(bids.find_best(), Some(7));

        bids.set_level(7, Quantity::from_raw(0));
        assert_eq!(bids.find_best(), Some(3));
    }

    #[test]
    fn book_side_shift_beyond_window_clears() {
        let mut asks = BookSide::new(4, Side::Ask);
        asks.set_level(0, Quantity::from_double(1.0));
        asks.shift(10);
        assert_eq!(asks.find_best(), None);
    }

    #[test]
    fn windowed_book_snapshot_tracks_best_prices() {
        let book = WindowedOrderBook::new(Price::from_double(0.1), Price::from_double(5.0));
        let update = BookUpdate {
            update_type: BookUpdateType::Snapshot,
            bids: vec![
                BookLevel::new(Price::from_double(100.0), Quantity::from_double(2.0)),
                BookLevel::new(Price::from_double(99.9), Quantity::from_double(1.0)),
            ],
            asks: vec![
                BookLevel::new(Price::from_double(100.1), Quantity::from_double(1.5)),
                BookLevel::new(Price::from_double(100.2), Quantity::from_double(3.0)),
            ],
            ..Default::default()
        };
        book.apply_update(&update);

        assert_eq!(book.best_bid(), Some(Price::from_double(100.0)));
        assert_eq!(book.best_ask(), Some(Price::from_double(100.1)));
    }

    #[test]
    fn windowed_book_out_of_window_price_reads_zero() {
        let book = WindowedOrderBook::new(Price::from_double(0.1), Price::from_double(5.0));
        assert_eq!(book.bid_at_price(Price::from_double(1_000_000.0)), Quantity::from_raw(0));
    }
}
