//! # Provenance Ledger Benchmarks
//!
//! | Operation | Path | Target |
//! |-----------|------|--------|
//! | Registration | validate + commit | < 10µs |
//! | Split | two records, two history entries | < 10µs |
//! | Merge | update + remove | < 10µs |
//! | History read | copy of one trail | < 1µs |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use provenance_ledger::prelude::*;
use rand::Rng;
use std::sync::Arc;

const ADMIN: Address = Address([0xAA; 20]);
const ORACLE: Address = Address([0x0E; 20]);

fn service() -> ProvenanceService<InMemoryGovernance, NoopEventSink> {
    ProvenanceService::new(
        LedgerConfig::default(),
        Arc::new(InMemoryGovernance::new(ADMIN, ORACLE)),
        Arc::new(NoopEventSink),
    )
    .unwrap()
}

fn populated(count: u64) -> ProvenanceService<InMemoryGovernance, NoopEventSink> {
    let svc = service();
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        svc.register_batch(
            CallContext::new(ADMIN, 1),
            BatchDraft::new(rng.gen_range(1_000..10_000), "Farm A", 1),
        )
        .unwrap();
    }
    svc
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("register_batch", size), &size, |b, &size| {
            b.iter_batched(
                service,
                |svc| {
                    for _ in 0..size {
                        black_box(
                            svc.register_batch(
                                CallContext::new(ADMIN, 1),
                                BatchDraft::new(100, "Farm A", 1).with_certification("ORG"),
                            )
                            .unwrap(),
                        );
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_split_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_merge");

    // History is bounded per batch, so every iteration starts from a fresh ledger.
    group.bench_function("split_then_merge", |b| {
        let ctx = CallContext::new(ADMIN, 2);
        b.iter_batched(
            || populated(1),
            |svc| {
                let child = svc.split_batch(ctx, BatchId::FIRST, 1).unwrap();
                svc.merge_batches(ctx, BatchId::FIRST, black_box(child)).unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");
    let svc = populated(10_000);

    group.bench_function("get_batch_details", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| black_box(svc.get_batch_details(BatchId(rng.gen_range(1..=10_000)))))
    });
    group.bench_function("get_batch_history", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| black_box(svc.get_batch_history(BatchId(rng.gen_range(1..=10_000)))))
    });
    group.bench_function("check_invariants", |b| {
        b.iter(|| black_box(svc.check_invariants()))
    });

    group.finish();
}

criterion_group!(benches, bench_register, bench_split_merge, bench_reads);
criterion_main!(benches);
