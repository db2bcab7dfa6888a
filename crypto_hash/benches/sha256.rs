use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crypto_hash::sha2::{HashEngine, Variant};

fn benchmark_sha2(c: &mut Criterion) {
    let buf = vec![0u8; 8192];

    for variant in Variant::all() {
        let mut group = c.benchmark_group(variant.to_string());

        for size in [8usize, 1024, 8192] {
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(format!("{size} bytes"), &size, |b, &size| {
                // 每个基准使用独立的实例, 每次迭代前重置
                let mut engine = HashEngine::new(*variant);
                let mut sum = Vec::with_capacity(engine.size());

                b.iter(|| {
                    engine.reset();
                    engine.update(black_box(&buf[..size]));
                    sum.clear();
                    engine.sum_into(&mut sum);
                    black_box(&sum);
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benchmark_sha2);
criterion_main!(benches);
