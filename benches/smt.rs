//! Benchmarks for batched updates and audit-path generation across the
//! caching strategies.
//!
//! ```bash
//! cargo bench --bench smt
//! ```
//!
//! The interesting comparison is between `nothing` and the caching
//! variants: caches pay on the update path and collect on the audit path.

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BatchSize, BenchmarkGroup, Criterion,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use smt::{
    Cache, CacheBranch, CacheBranchMinus, CacheBranchPlus, CacheNothing, Digest, KeySet,
    LeafValue, Sha512Trunc256, Smt, TreeHash,
};
use std::hint::black_box;

const TREE_SIZE: usize = 1 << 10;
const BATCH_SIZE: usize = 256;

fn fresh_keys(rng: &mut StdRng, count: usize) -> Vec<Digest> {
    let oracle = Sha512Trunc256::new();
    let mut keys: Vec<Digest> =
        (0..count).map(|_| oracle.digest(&[&rng.gen::<[u8; 32]>()])).collect();
    keys.sort();
    keys.dedup();
    keys
}

/// An engine already holding `data`, so benches measure steady-state cost
/// rather than first-fill cost.
fn preloaded<C: Cache>(cache: C, data: &[Digest]) -> Smt<Sha512Trunc256, C> {
    let mut s = Smt::new(&[0x42], cache, Sha512Trunc256::new());
    let (n, base) = (s.n(), s.base().to_vec());
    s.update(
        KeySet::new(data).unwrap(),
        KeySet::new(data).unwrap(),
        n,
        &base,
        LeafValue::Set,
    );
    s
}

fn bench_update_with<C: Cache + Clone>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: &str,
    cache: C,
    data: &[Digest],
    merged: &[Digest],
    batch: &[Digest],
) {
    let s = preloaded(cache, data);
    let (n, base) = (s.n(), s.base().to_vec());
    group.bench_function(name, |b| {
        b.iter_batched(
            || s.clone(),
            |mut s| {
                black_box(s.update(
                    KeySet::new(merged).unwrap(),
                    KeySet::new(batch).unwrap(),
                    n,
                    &base,
                    LeafValue::Set,
                ))
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_audit_with<C: Cache>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: &str,
    cache: C,
    data: &[Digest],
    probes: &[Digest],
) {
    let s = preloaded(cache, data);
    let (n, base) = (s.n(), s.base().to_vec());
    let d = KeySet::new(data).unwrap();
    let mut next = 0usize;
    group.bench_function(name, |b| {
        b.iter(|| {
            let probe = &probes[next % probes.len()];
            next += 1;
            black_box(s.audit_path(d, n, &base, probe))
        })
    });
}

fn update_batch(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x1534);
    let data = fresh_keys(&mut rng, TREE_SIZE);
    let batch = fresh_keys(&mut rng, BATCH_SIZE);
    let mut merged = data.clone();
    merged.extend(batch.iter().cloned());
    merged.sort();
    merged.dedup();

    let mut group = c.benchmark_group("update_256_into_1k");
    group.sample_size(20);
    bench_update_with(&mut group, "nothing", CacheNothing, &data, &merged, &batch);
    bench_update_with(&mut group, "branch", CacheBranch::new(), &data, &merged, &batch);
    bench_update_with(&mut group, "branch_plus", CacheBranchPlus::new(), &data, &merged, &batch);
    bench_update_with(
        &mut group,
        "branch_minus_0.5",
        CacheBranchMinus::new(0.5),
        &data,
        &merged,
        &batch,
    );
    group.finish();
}

fn audit_path(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x0a0d);
    let data = fresh_keys(&mut rng, TREE_SIZE);
    let probes = fresh_keys(&mut rng, 64);

    let mut group = c.benchmark_group("audit_path_1k");
    bench_audit_with(&mut group, "nothing", CacheNothing, &data, &probes);
    bench_audit_with(&mut group, "branch", CacheBranch::new(), &data, &probes);
    bench_audit_with(&mut group, "branch_plus", CacheBranchPlus::new(), &data, &probes);
    bench_audit_with(&mut group, "branch_minus_0.5", CacheBranchMinus::new(0.5), &data, &probes);
    group.finish();
}

criterion_group!(benches, update_batch, audit_path);
criterion_main!(benches);
