//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Blowfish benchmarks
//!
//! Key schedule cost and ECB throughput.

use bfguard::blowfish::Blowfish;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark: key schedule
fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("blowfish_key_schedule");

    for len in [4usize, 16, 56].iter() {
        let key = vec![0xA5u8; *len];
        group.bench_with_input(BenchmarkId::from_parameter(len), &key, |b, key| {
            b.iter(|| Blowfish::new(black_box(key)));
        });
    }

    group.finish();
}

/// Benchmark: single block
fn bench_block(c: &mut Criterion) {
    let cipher = Blowfish::new(b"benchmark key").unwrap();

    c.bench_function("blowfish_encipher_block", |b| {
        b.iter(|| cipher.encipher(black_box(0x0123_4567), black_box(0x89AB_CDEF)));
    });
    c.bench_function("blowfish_decipher_block", |b| {
        b.iter(|| cipher.decipher(black_box(0x0123_4567), black_box(0x89AB_CDEF)));
    });
}

/// Benchmark: ECB throughput
fn bench_ecb_throughput(c: &mut Criterion) {
    let cipher = Blowfish::new(b"benchmark key").unwrap();
    let mut group = c.benchmark_group("blowfish_ecb");

    for size in [64usize, 1024, 16384].iter() {
        let data = vec![0x5Au8; *size];
        let encrypted = cipher.encrypt(&data);
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("encrypt", size), &data, |b, data| {
            b.iter(|| cipher.encrypt(black_box(data)));
        });
        group.bench_with_input(BenchmarkId::new("decrypt", size), &encrypted, |b, data| {
            b.iter(|| cipher.decrypt(black_box(data)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_schedule,
    bench_block,
    bench_ecb_throughput
);
criterion_main!(benches);
