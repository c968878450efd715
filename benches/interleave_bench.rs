use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strided_interleave::{interleave_subarrays, StridedArray};

// Construction cost: validation, broadcasting and index-state setup for a
// tiny pair of inputs.
fn bench_construct(c: &mut Criterion) {
    let x = StridedArray::<f64>::from_fn_row_major(&[1, 1, 4], |idx| idx[2] as f64);
    let views = [x.view(), x.view()];
    c.bench_function("construct", |b| {
        b.iter(|| interleave_subarrays(black_box(&views), 2).map(|it| it.len()))
    });
}

// Per-pull cost over a tall `[n, 1, 1]` stack.
fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");
    for n in [1_000usize, 100_000] {
        group.throughput(Throughput::Elements(2 * n as u64));
        let x = StridedArray::<f64>::from_fn_row_major(&[n, 1, 1], |idx| idx[0] as f64);
        let views = [x.view(), x.view()];

        group.bench_with_input(BenchmarkId::new("pull", n), &n, |b, _| {
            b.iter(|| {
                let it = match interleave_subarrays(&views, 2) {
                    Ok(it) => it,
                    Err(err) => panic!("construction failed: {err}"),
                };
                it.map(|v| v.get(&[0, 0])).sum::<f64>()
            })
        });

        group.bench_with_input(BenchmarkId::new("broadcast", n), &n, |b, _| {
            let y = StridedArray::<f64>::row_major(&[1, 1]);
            let mixed = [x.view(), y.view()];
            b.iter(|| {
                let it = match interleave_subarrays(&mixed, 2) {
                    Ok(it) => it,
                    Err(err) => panic!("construction failed: {err}"),
                };
                it.count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construct, bench_iteration);
criterion_main!(benches);
