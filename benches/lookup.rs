use std::collections::HashSet;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::distributions::Uniform;
use rand::{Rng, thread_rng};
use rand::prelude::IteratorRandom;
use bloom_filter::BloomFilter;

pub fn lookup_values(c: &mut Criterion) {
    let bf = BloomFilter::with_capacity(10u64.pow(6), 0.02).unwrap();
    let mut track_inserted = HashSet::new();

    let mut rng = thread_rng();
    let distribution = Uniform::new_inclusive(0, 10u64.pow(12));
    for _ in 0..10u32.pow(6) {
        let value = rng.sample(distribution).to_be_bytes();
        bf.insert(&value);
        track_inserted.insert(value);
    }

    let mut bgroup = c.benchmark_group("lookup-values");
    bgroup.bench_function("lookup-random-values",
                     |b|
                         b.iter(||
                             bf.lookup(
                                 &rng.sample(distribution).to_be_bytes()
                             )
                         ));

    bgroup.bench_function("lookup-inserted-values",
                     |b|
                         b.iter(||
                             bf.lookup(track_inserted.iter().choose(&mut rng).unwrap())
                         ));
    bgroup.finish();
}

pub fn insert_values(c: &mut Criterion) {
    let bf = BloomFilter::with_capacity(10u64.pow(6), 0.02).unwrap();
    let mut rng = thread_rng();
    let distribution = Uniform::new_inclusive(0, 10u64.pow(12));

    c.bench_function("insert-random-values",
                     |b|
                         b.iter(||
                             bf.insert(&rng.sample(distribution).to_be_bytes())
                         ));
}

pub fn serialize_filter(c: &mut Criterion) {
    let bf = BloomFilter::with_capacity(10u64.pow(6), 0.02).unwrap();
    for i in 0..10u64.pow(5) {
        bf.insert(&i.to_be_bytes());
    }
    let bytes = bf.serialize();

    c.bench_function("serialize", |b| b.iter(|| bf.serialize()));
    c.bench_function("deserialize", |b| b.iter(|| BloomFilter::deserialize(&bytes).unwrap()));
}

criterion_group!(benches, lookup_values, insert_values, serialize_filter);
criterion_main!(benches);
