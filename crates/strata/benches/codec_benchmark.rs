//! Benchmarks for the dual-format codec and the in-memory store
//!
//! Run with: cargo bench --bench codec_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strata::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    addr: String,
    balance: u64,
    sequence: u64,
    pub_key: Vec<u8>,
}
impl Encodable for Account {}

fn codec(cache: bool) -> DualCodec {
    let mut config = CodecConfig::new(1_000);
    if !cache {
        config = config.without_decode_cache();
    }
    let mut builder = DualCodec::builder(config);
    builder
        .register_structure::<Account>("auth/Account")
        .unwrap();
    builder.build().unwrap()
}

fn account(i: u64) -> Account {
    Account {
        addr: format!("addr{:08}", i),
        balance: i * 10,
        sequence: i,
        pub_key: vec![7u8; 33],
    }
}

fn bench_marshal(c: &mut Criterion) {
    let codec = codec(false);
    let value = account(1);
    let mut group = c.benchmark_group("marshal");

    for (label, height) in [("legacy", 10), ("modern", 2_000)] {
        group.bench_function(label, |b| {
            b.iter(|| codec.marshal_binary_bare(black_box(&value), height).unwrap())
        });
    }
    group.finish();
}

fn bench_decode_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_hot_value");

    for (label, cached) in [("cache_off", false), ("cache_on", true)] {
        let codec = codec(cached);
        for (format, height) in [("legacy", 10), ("modern", 2_000)] {
            let bytes = codec.marshal_binary_bare(&account(1), height).unwrap();
            group.bench_function(BenchmarkId::new(label, format), |b| {
                b.iter(|| {
                    let decoded: Account = codec.decode(black_box(&bytes), height).unwrap();
                    decoded
                })
            });
        }
    }
    group.finish();
}

fn bench_memdb(c: &mut Criterion) {
    let mut group = c.benchmark_group("memdb");

    for size in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("batch_write", size), size, |b, &size| {
            b.iter_batched(
                MemDb::new,
                |db| {
                    let mut batch = db.new_batch();
                    for i in 0..size {
                        batch.set(&i.to_be_bytes(), b"value").unwrap();
                    }
                    batch.write().unwrap()
                },
                criterion::BatchSize::SmallInput,
            );
        });

        let db = MemDb::new();
        for i in 0..*size {
            db.set(&i.to_be_bytes(), b"value").unwrap();
        }
        group.bench_with_input(BenchmarkId::new("full_scan", size), size, |b, _| {
            b.iter(|| {
                let mut iter = db.iterator(None, None).unwrap();
                let mut count = 0usize;
                while iter.valid() {
                    count += 1;
                    iter.next();
                }
                count
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_marshal, bench_decode_cache, bench_memdb);
criterion_main!(benches);
