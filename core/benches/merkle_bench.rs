// Merkle root benchmarks for the UMI core formats.
//
// Covers root computation at several block sizes and quantifies what the
// scratch-buffer pool saves over a fresh allocation per call.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use umi_core::{Block, MerkleBuilder, ScratchPool, Transaction};

fn block_with_transactions(n: u64) -> Block {
    let mut block = Block::new();
    for nonce in 0..n {
        let mut tx = Transaction::new();
        tx.set_nonce(nonce).set_value(nonce * 1000);
        block.append_transaction(&tx).unwrap();
    }
    block
}

fn bench_merkle_root(c: &mut Criterion) {
    let builder = MerkleBuilder::new(Arc::new(ScratchPool::new()));
    let mut group = c.benchmark_group("merkle/root");

    for &n in &[1u64, 10, 100, 1_000, 10_000] {
        let block = block_with_transactions(n);
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &block, |b, block| {
            b.iter(|| builder.root(block).unwrap());
        });
    }

    group.finish();
}

fn bench_pool_vs_fresh(c: &mut Criterion) {
    let block = block_with_transactions(1_000);
    let mut group = c.benchmark_group("merkle/pool");

    let shared = MerkleBuilder::new(Arc::new(ScratchPool::new()));
    group.bench_function("warm_pool", |b| {
        b.iter(|| shared.root(&block).unwrap());
    });

    group.bench_function("cold_pool_every_call", |b| {
        b.iter(|| MerkleBuilder::default().root(&block).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_merkle_root, bench_pool_vs_fresh);
criterion_main!(benches);
