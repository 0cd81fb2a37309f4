//! S1/S2 from the end-to-end book scenarios: snapshot+delta tracking and
//! consuming a dense book.

use tradecore::book::{BookLevel, BookUpdate, BookUpdateType, nlevel::NLevelOrderBook};
use tradecore::decimal::{Price, Quantity};

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
fn s1_snapshot_then_delta() {
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
fn s2_consume_dense_book() {
    let mut book: NLevelOrderBook<8192> = NLevelOrderBook::new(Price::from_double(0.1));
    book.apply_update(&snapshot(vec![], vec![(100.0, 1.0), (100.1, 2.0), (100.2, 3.0)]));

    let (filled, notional) = book.consume_asks(Quantity::from_double(2.5));
    assert_eq!(filled, Quantity::from_double(2.5));
    assert!((notional.to_double() - 250.15).abs() < 1e-6);

    let (filled, notional) = book.consume_asks(Quantity::from_double(10.0));
    assert_eq!(filled, Quantity::from_double(6.0));
    assert!((notional.to_double() - 600.80).abs() < 1e-6);
}
