use criterion::{black_box, criterion_group, criterion_main, Criterion};

use medianator::medianator::{calc_median, encode, merge_prices, OraclePrice, OracleReport};

fn stored_set(n: usize) -> Vec<OracleReport> {
    (0..n)
        .map(|i| {
            OracleReport::new(
                format!("aleo1oracle{:02}", i),
                format!("sign1sig{:02}", i),
                OraclePrice::from_raw_price(100_000_000 + (i as i64 * 7919) % 1_000_000),
            )
        })
        .collect()
}

fn bench_round(c: &mut Criterion) {
    let stored = stored_set(15);
    let new_report = OracleReport::new(
        "aleo1oracle03",
        "sign1fresh",
        OraclePrice::from_raw_price(100_500_000i64),
    );

    c.bench_function("merge_median_encode_16", |b| {
        b.iter(|| {
            let merged = merge_prices(black_box(stored.clone()), black_box(new_report.clone()));
            let result = calc_median(merged).unwrap();
            encode(&result.sorted).unwrap()
        })
    });
}

criterion_group!(benches, bench_round);
criterion_main!(benches);
