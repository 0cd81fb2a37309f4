use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tradecore::decimal::{Price, Quantity, mul_price_quantity};

fn bench_decimal(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimal");

    let a = Price::from_double(12_345.678_9);
    let b = Price::from_double(2.5);

    group.bench_function("from_double", |bencher| {
        bencher.iter(|| Price::from_double(black_box(12_345.678_9)))
    });

    group.bench_function("mul_same_tag", |bencher| bencher.iter(|| black_box(a).mul(black_box(b))));

    group.bench_function("div_same_tag", |bencher| {
        bencher.iter(|| black_box(a).div(black_box(b)).unwrap())
    });

    let qty = Quantity::from_double(3.25);
    group.bench_function("mul_price_quantity", |bencher| {
        bencher.iter(|| mul_price_quantity(black_box(a), black_box(qty)))
    });

    group.finish();
}

criterion_group!(benches, bench_decimal);
criterion_main!(benches);
