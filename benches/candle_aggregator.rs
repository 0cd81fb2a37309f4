use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tradecore::candle::CandleAggregator;
use tradecore::decimal::{Price, Quantity};
use tradecore::events::{InstrumentType, TradeEvent};

fn trade(price: f64, ts_ns: i64) -> TradeEvent {
    TradeEvent {
        symbol: 0,
        instrument: InstrumentType::Spot,
        price: Price::from_double(price),
        quantity: Quantity::from_double(1.0),
        is_buy: true,
        exchange_ts_ns: ts_ns,
        tick_sequence: 0,
    }
}

fn bench_candle_aggregator(c: &mut Criterion) {
    let mut group = c.benchmark_group("candle_aggregator");

    group.bench_function("on_trade_same_bucket", |bencher| {
        let mut agg = CandleAggregator::new(Duration::from_secs(60));
        agg.start();
        let t = trade(100.0, 0);
        bencher.iter(|| agg.on_trade(black_box(&t), |_| {}));
    });

    group.bench_function("on_trade_rolling_bucket", |bencher| {
        let mut agg = CandleAggregator::new(Duration::from_millis(1));
        agg.start();
        let mut ts = 0i64;
        bencher.iter(|| {
            let t = trade(100.0, ts);
            ts += 1_000_000;
            agg.on_trade(black_box(&t), |_| {});
        });
    });

    group.finish();
}

criterion_group!(benches, bench_candle_aggregator);
criterion_main!(benches);
