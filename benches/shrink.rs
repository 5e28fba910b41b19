//! Criterion benchmarks for the one-shot compression API.
//!
//! Run with:
//!   cargo bench --bench shrink
//!
//! Corpora are generated deterministically so runs are comparable across
//! machines without shipping test data.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Deterministic pseudo-random bytes (64-bit LCG, high byte taken).
fn lcg_bytes(mut seed: u64, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        out.push((seed >> 56) as u8);
    }
    out
}

/// Text-like compressible data: repeated phrases with noise sprinkled in.
fn text_corpus(len: usize) -> Vec<u8> {
    const PHRASES: &[&[u8]] = &[
        b"the quick brown fox jumps over the lazy dog. ",
        b"pack my box with five dozen liquor jugs. ",
        b"sphinx of black quartz, judge my vow. ",
        b"0123456789",
    ];
    let mut out = Vec::with_capacity(len + 64);
    let mut seed = 0xc0ffee_u64;
    while out.len() < len {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let pick = (seed >> 56) as usize % (PHRASES.len() + 1);
        if pick < PHRASES.len() {
            out.extend_from_slice(PHRASES[pick]);
        } else {
            out.push((seed >> 40) as u8);
        }
    }
    out.truncate(len);
    out
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for &size in &[4_096usize, 65_536] {
        let text = text_corpus(size);
        let noise = lcg_bytes(1, size);
        let mut output = vec![0u8; zx0::compress_bound(size)];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("text", size), &text, |b, data| {
            b.iter(|| {
                zx0::compress(data, &mut output, zx0::FLG_IS_INVERTED, 0, 0, None, None).unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("noise", size), &noise, |b, data| {
            b.iter(|| {
                zx0::compress(data, &mut output, zx0::FLG_IS_INVERTED, 0, 0, None, None).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress);
criterion_main!(benches);
