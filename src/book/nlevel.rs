//! A fixed-size, array-indexed order book with a sliding price window.
//!
//! `bid_levels`/`ask_levels` are fixed-length `MAX_LEVELS` vectors; a signed
//! `base_index` maps array slot `0` to an absolute tick index, so the window
//! can slide to follow the market without reallocating. Best-price pointers
//! are cached and only rescanned when the cache is invalidated by a level
//! at the current best going to zero.

use crate::book::types::{BookLevel, BookUpdate, BookUpdateType};
use crate::decimal::{Price, Quantity};

/// Sentinel meaning "no cached best" / "local index out of window", equal
/// to the array length.
const NONE: usize = usize::MAX;

/// Minimum margin, in ticks, a snapshot's range must keep from both window
/// edges before `base_index` is left untouched (reanchor hysteresis).
const REANCHOR_HYSTERESIS: i64 = 8;

/// Smallest quantity treated as "still have demand" while walking depth.
const EPS_QTY_RAW: i64 = 1;

/// A fixed-capacity, array-indexed order book of `MAX_LEVELS` price levels
/// per side.
pub struct NLevelOrderBook<const MAX_LEVELS: usize> {
    tick_size: Price,
    base_index: i64,

    bid_levels: Vec<Quantity>,
    ask_levels: Vec<Quantity>,

    min_bid: usize,
    max_bid: usize,
    min_ask: usize,
    max_ask: usize,

    best_bid_idx: usize,
    best_ask_idx: usize,
    best_bid_tick: i64,
    best_ask_tick: i64,
}

impl<const MAX_LEVELS: usize> NLevelOrderBook<MAX_LEVELS> {
    /// Creates an empty book with the given `tick_size`.
    pub fn new(tick_size: Price) -> Self {
        let mut book = Self {
            tick_size,
            base_index: 0,
            bid_levels: vec![Quantity::from_raw(0); MAX_LEVELS],
            ask_levels: vec![Quantity::from_raw(0); MAX_LEVELS],
            min_bid: MAX_LEVELS,
            max_bid: 0,
            min_ask: MAX_LEVELS,
            max_ask: 0,
            best_bid_idx: NONE,
            best_ask_idx: NONE,
            best_bid_tick: -1,
            best_ask_tick: -1,
        };
        book.clear();
        book
    }

    /// Resets the book to empty, discarding the window position.
    pub fn clear(&mut self) {
        self.bid_levels.iter_mut().for_each(|q| *q = Quantity::from_raw(0));
        self.ask_levels.iter_mut().for_each(|q| *q = Quantity::from_raw(0));
        self.min_bid = MAX_LEVELS;
        self.max_bid = 0;
        self.min_ask = MAX_LEVELS;
        self.max_ask = 0;
        self.base_index = 0;
        self.best_bid_idx = NONE;
        self.best_ask_idx = NONE;
        self.best_bid_tick = -1;
        self.best_ask_tick = -1;
    }

    /// The configured tick size.
    pub fn tick_size(&self) -> Price {
        self.tick_size
    }

    /// Rounds a price to the nearest tick index, half away from zero.
    fn ticks(&self, price: Price) -> i64 {
        let ts = self.tick_size.raw() as i128;
        if ts == 0 {
            return 0;
        }
        let p = price.raw() as i128;
        let half = ts / 2;
        let rounded = if p >= 0 { (p + half) / ts } else { (p - half) / ts };
        rounded as i64
    }

    fn index_to_price(&self, i: usize) -> Price {
        let tick = self.base_index + i as i64;
        Price::from_raw(self.tick_size.raw() * tick)
    }

    fn local_index(&self, price: Price) -> usize {
        let t = self.ticks(price) - self.base_index;
        if t >= 0 && (t as usize) < MAX_LEVELS {
            t as usize
        } else {
            MAX_LEVELS
        }
    }

    fn reanchor(&mut self, min_idx: i64, max_idx: i64) {
        let span = max_idx - min_idx + 1;
        let cur_lo = self.base_index;
        let cur_hi = self.base_index + MAX_LEVELS as i64 - 1;

        if cur_lo + REANCHOR_HYSTERESIS <= min_idx && max_idx <= cur_hi - REANCHOR_HYSTERESIS {
            return;
        }

        if span >= MAX_LEVELS as i64 {
            self.base_index = min_idx;
        } else {
            let mid = (min_idx + max_idx).div_euclid(2);
            self.base_index = mid - (MAX_LEVELS as i64 / 2);
        }
    }

    fn next_nonzero(levels: &[Quantity], from: usize) -> usize {
        for i in from..levels.len() {
            if !levels[i].is_zero() {
                return i;
            }
        }
        MAX_LEVELS
    }

    fn prev_nonzero(levels: &[Quantity], from: usize) -> usize {
        if from >= levels.len() {
            return MAX_LEVELS;
        }
        let mut i = from as isize;
        while i >= 0 {
            if !levels[i as usize].is_zero() {
                return i as usize;
            }
            i -= 1;
        }
        MAX_LEVELS
    }

    /// Applies a snapshot or delta to the book.
    pub fn apply_update(&mut self, update: &BookUpdate) {
        if update.update_type == BookUpdateType::Snapshot {
            self.apply_snapshot(update);
        }
        self.apply_bid_levels(&update.bids);
        self.apply_ask_levels(&update.asks);
    }

    fn apply_snapshot(&mut self, update: &BookUpdate) {
        let mut min_idx = i64::MAX;
        let mut max_idx = i64::MIN;
        for level in update.bids.iter().chain(update.asks.iter()) {
            let t = self.ticks(level.price);
            min_idx = min_idx.min(t);
            max_idx = max_idx.max(t);
        }

        if min_idx == i64::MAX {
            self.clear();
        } else {
            self.reanchor(min_idx, max_idx);
        }

        self.bid_levels.iter_mut().for_each(|q| *q = Quantity::from_raw(0));
        self.ask_levels.iter_mut().for_each(|q| *q = Quantity::from_raw(0));
        self.min_bid = MAX_LEVELS;
        self.max_bid = 0;
        self.min_ask = MAX_LEVELS;
        self.max_ask = 0;
        self.best_bid_idx = NONE;
        self.best_ask_idx = NONE;
        self.best_bid_tick = -1;
        self.best_ask_tick = -1;
    }

    fn apply_bid_levels(&mut self, levels: &[BookLevel]) {
        for level in levels {
            let i = self.local_index(level.price);
            if i >= MAX_LEVELS {
                continue;
            }

            let had = !self.bid_levels[i].is_zero();
            if self.bid_levels[i].raw() == level.quantity.raw() {
                continue;
            }
            self.bid_levels[i] = level.quantity;

            if !level.quantity.is_zero() {
                if i < self.min_bid {
                    self.min_bid = i;
                }
                if i > self.max_bid {
                    self.max_bid = i;
                }
                if self.best_bid_idx >= MAX_LEVELS || i > self.best_bid_idx {
                    self.best_bid_idx = i;
                    self.best_bid_tick = self.base_index + i as i64;
                }
            } else if had {
                if i == self.best_bid_idx {
                    self.best_bid_idx = Self::prev_nonzero(&self.bid_levels, i.wrapping_sub(1));
                    self.best_bid_tick =
                        if self.best_bid_idx < MAX_LEVELS { self.base_index + self.best_bid_idx as i64 } else { -1 };
                }
                if i == self.min_bid {
                    self.min_bid = Self::next_nonzero(&self.bid_levels, self.min_bid);
                }
                if i == self.max_bid {
                    self.max_bid = Self::prev_nonzero(&self.bid_levels, self.max_bid.wrapping_sub(1));
                }
            }
        }
    }

    fn apply_ask_levels(&mut self, levels: &[BookLevel]) {
        for level in levels {
            let i = self.local_index(level.price);
            if i >= MAX_LEVELS {
                continue;
            }

            let had = !self.ask_levels[i].is_zero();
            if self.ask_levels[i].raw() == level.quantity.raw() {
                continue;
            }
            self.ask_levels[i] = level.quantity;

            if !level.quantity.is_zero() {
                if i < self.min_ask {
                    self.min_ask = i;
                }
                if i > self.max_ask {
                    self.max_ask = i;
                }
                if self.best_ask_idx >= MAX_LEVELS || i < self.best_ask_idx {
                    self.best_ask_idx = i;
                    self.best_ask_tick = self.base_index + i as i64;
                }
            } else if had {
                if i == self.best_ask_idx {
                    self.best_ask_idx = Self::next_nonzero(&self.ask_levels, i + 1);
                    self.best_ask_tick =
                        if self.best_ask_idx < MAX_LEVELS { self.base_index + self.best_ask_idx as i64 } else { -1 };
                }
                if i == self.min_ask {
                    self.min_ask = Self::next_nonzero(&self.ask_levels, self.min_ask + 1);
                }
                if i == self.max_ask {
                    self.max_ask = Self::prev_nonzero(&self.ask_levels, self.max_ask.wrapping_sub(1));
                }
            }
        }
    }

    /// The best (maximum-price) non-zero bid level, if any.
    pub fn best_bid(&self) -> Option<Price> {
        if self.best_bid_tick < 0 {
            return None;
        }
        Some(Price::from_raw(self.tick_size.raw() * self.best_bid_tick))
    }

    /// The best (minimum-price) non-zero ask level, if any.
    pub fn best_ask(&self) -> Option<Price> {
        if self.best_ask_tick < 0 {
            return None;
        }
        Some(Price::from_raw(self.tick_size.raw() * self.best_ask_tick))
    }

    /// Quantity resting at a given bid price, zero if out of window or empty.
    pub fn bid_at_price(&self, price: Price) -> Quantity {
        let i = self.local_index(price);
        if i < MAX_LEVELS { self.bid_levels[i] } else { Quantity::from_raw(0) }
    }

    /// Quantity resting at a given ask price, zero if out of window or empty.
    pub fn ask_at_price(&self, price: Price) -> Quantity {
        let i = self.local_index(price);
        if i < MAX_LEVELS { self.ask_levels[i] } else { Quantity::from_raw(0) }
    }

    /// Walks the ask side from the best price upward, taking `min(level,
    /// remaining)` at each non-zero level. Returns `(filled, notional)`.
    /// Does not mutate the book.
    pub fn consume_asks(&self, need_qty: Quantity) -> (Quantity, Quantity) {
        if self.best_ask_idx >= MAX_LEVELS {
            return (Quantity::from_raw(0), Quantity::from_raw(0));
        }

        let mut remaining = need_qty.raw();
        let mut notional = 0i128;
        let scale = crate::decimal::DEFAULT_SCALE as i128;

        let hi = self.max_ask;
        let mut i = self.best_ask_idx;
        let mut px = self.index_to_price(i).raw();

        while i <= hi && remaining > EPS_QTY_RAW {
            let level = self.ask_levels[i].raw();
            if level > 0 {
                let take = level.min(remaining);
                notional += take as i128 * px as i128 / scale;
                remaining -= take;
            }
            i += 1;
            px += self.tick_size.raw();
        }

        let filled = need_qty.raw() - remaining;
        (Quantity::from_raw(filled), Quantity::from_raw(notional as i64))
    }

    /// Walks the bid side from the best price downward, taking `min(level,
    /// remaining)` at each non-zero level. Returns `(filled, notional)`.
    /// Does not mutate the book.
    pub fn consume_bids(&self, need_qty: Quantity) -> (Quantity, Quantity) {
        if self.best_bid_idx >= MAX_LEVELS {
            return (Quantity::from_raw(0), Quantity::from_raw(0));
        }

        let mut remaining = need_qty.raw();
        let mut notional = 0i128;
        let scale = crate::decimal::DEFAULT_SCALE as i128;

        let lo = self.min_bid;
        let mut i = self.best_bid_idx;
        let mut px = self.index_to_price(i).raw();

        loop {
            if remaining <= EPS_QTY_RAW {
                break;
            }
            let level = self.bid_levels[i].raw();
            if level > 0 {
                let take = level.min(remaining);
                notional += take as i128 * px as i128 / scale;
                remaining -= take;
            }
            if i == lo {
                break;
            }
            i -= 1;
            px -= self.tick_size.raw();
        }

        let filled = need_qty.raw() - remaining;
        (Quantity::from_raw(filled), Quantity::from_raw(notional as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::types::BookLevel;

    fn snapshot(bids: Vec<(f64, f64)>, asks: Vec<(f64, f64)>) -> BookUpdate {
        BookUpdate {
            update_type: BookUpdateType::Snapshot,
            bids: bids.into_iter().map(|(p, q)| BookLevel::new(Price::from_double(p), Quantity::from_double(q))).collect(),
            asks: asks.into_iter().map(|(p, q)| BookLevel::new(Price::from_double(p), Quantity::from_double(q))).collect(),
            ..Default::default()
        }
    }

    fn delta(bids: Vec<(f64, f64)>, asks: Vec<(f64, f64)>) -> BookUpdate {
        let mut u = snapshot(bids, asks);
        u.update_type = BookUpdateType::Delta;
        u
    }

    #[test]
    fn snapshot_then_delta_tracks_best_prices() {
        let mut book: NLevelOrderBook<8192> = NLevelOrderBook::new(Price::from_double(0.1));
        book.apply_update(&snapshot(vec![(100.0, 2.0), (99.0, 1.0)], vec![(101.0, 1.5), (102.0, 3.0)]));

        assert_eq!(book.best_bid(), Some(Price::from_double(100.0)));
        assert_eq!(book.best_ask(), Some(Price::from_double(101.0)));
        assert_eq!(book.bid_at_price(Price::from_double(99.0)), Quantity::from_double(1.0));
        assert_eq!(book.ask_at_price(Price::from_double(102.0)), Quantity::from_double(3.0));

        book.apply_update(&delta(vec![(100.0, 0.0), (99.0, 1.5)], vec![(101.0, 3.0)]));

        assert_eq!(book.best_bid(), Some(Price::from_double(99.0)));
        assert_eq!(book.best_ask(), Some(Price::from_double(101.0)));
        assert_eq!(book.bid_at_price(Price::from_double(99.0)), Quantity::from_double(1.5));
        assert_eq!(book.bid_at_price(Price::from_double(100.0)), Quantity::from_raw(0));
        assert_eq!(book.ask_at_price(Price::from_double(101.0)), Quantity::from_double(3.0));
    }

    #[test]
    fn consume_asks_walks_dense_book_in_price_order() {
        let mut book: NLevelOrderBook<8192> = NLevelOrderBook::new(Price::from_double(0.1));
        book.apply_update(&snapshot(vec![], vec![(100.0, 1.0), (100.1, 2.0), (100.2, 3.0)]));

        let (filled, notional) = book.consume_asks(Quantity::from_double(2.5));
        assert_eq!(filled, Quantity::from_double(2.5));
        assert!((notional.to_double() - 250.15).abs() < 1e-6);

        let (filled, notional) = book.consume_asks(Quantity::from_double(10.0));
        assert_eq!(filled, Quantity::from_double(6.0));
        assert!((notional.to_double() - 600.80).abs() < 1e-6);
    }

    #[test]
    fn consume_bids_walks_downward_from_best() {
        let mut book: NLevelOrderBook<8192> = NLevelOrderBook::new(Price::from_double(0.1));
        book.apply_update(&snapshot(vec![(100.0, 1.0), (99.9, 2.0), (99.8, 3.0)], vec![]));

        let (filled, _) = book.consume_bids(Quantity::from_double(2.5));
        assert_eq!(filled, Quantity::from_double(2.5));
    }

    #[test]
    fn empty_book_reports_no_best_and_empty_consume() {
        let book: NLevelOrderBook<8192> = NLevelOrderBook::new(Price::from_double(0.1));
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        let (filled, notional) = book.consume_asks(Quantity::from_double(1.0));
        assert_eq!(filled, Quantity::from_raw(0));
        assert_eq!(notional, Quantity::from_raw(0));
    }
}
