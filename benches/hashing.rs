//! Criterion benchmarks for identifier parsing and ring arithmetic.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chainattr::{AttributeKey, AttributeValue, CoordinateResolver, NodeRef, PartitionId, RingId};

/// Benchmark: `AttributeKey::parse` with varying key lengths
fn bench_key_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("key/parse");

    let cases = [
        ("short", "color".to_string()),
        ("typical", "description".to_string()),
        ("max", "k".repeat(64)),
    ];

    for (name, key) in &cases {
        group.throughput(Throughput::Bytes(key.len() as u64));
        group.bench_with_input(BenchmarkId::new("key", name), key, |b, key| {
            b.iter(|| AttributeKey::parse(black_box(key)));
        });
    }

    group.finish();
}

/// Benchmark: ring position derivation (one SHA-256 each)
fn bench_ring_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring/hash");
    let key = AttributeKey::parse("material").expect("valid key");
    let node = NodeRef::derive("node1");

    group.bench_function("of_key", |b| b.iter(|| RingId::of_key(black_box(&key))));
    group.bench_function("of_node", |b| b.iter(|| RingId::of_node(black_box(&node))));
    group.bench_function("node_ref_derive", |b| {
        b.iter(|| NodeRef::derive(black_box("node1")));
    });

    group.finish();
}

/// Benchmark: modular arithmetic and interval tests used on every routing hop
fn bench_ring_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring/arithmetic");
    let a = RingId::of_node(&NodeRef::derive("node1"));
    let b = RingId::of_node(&NodeRef::derive("node2"));
    let x = RingId::of_key(&AttributeKey::parse("color").expect("valid key"));

    group.bench_function("distance_to", |bench| {
        bench.iter(|| black_box(&a).distance_to(black_box(&b)));
    });
    group.bench_function("in_half_open", |bench| {
        bench.iter(|| black_box(&x).in_half_open(black_box(&a), black_box(&b)));
    });

    for exponent in [0usize, 128, 255] {
        group.bench_with_input(
            BenchmarkId::new("add_power_of_two", exponent),
            &exponent,
            |bench, &exponent| bench.iter(|| black_box(&a).add_power_of_two(exponent)),
        );
    }

    group.finish();
}

/// Benchmark: value packing and coordinate resolution
fn bench_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("values");
    let resolver = CoordinateResolver::new(PartitionId::new(31337));
    let node = NodeRef::derive("node1");

    group.bench_function("value_from_text", |b| {
        b.iter(|| AttributeValue::from_text(black_box("This is a dnmt description")));
    });
    group.bench_function("resolve", |b| {
        b.iter(|| resolver.resolve(black_box(PartitionId::new(31338)), black_box(node)));
    });
    group.bench_function("node_ref_parse", |b| {
        b.iter(|| NodeRef::parse(black_box("0x5fbdb2315678afecb367f032d93f642f64180aa3")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_key_parse,
    bench_ring_hash,
    bench_ring_arithmetic,
    bench_values
);
criterion_main!(benches);
