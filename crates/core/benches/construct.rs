use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use invocate_core::{args, chain, Args, CallableRef, Cause, ErrorFactory, InvocationErrorFactory};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_args(n: usize) -> Args {
    (0..n).map(|i| (i, format!("arg-{i}"))).collect()
}

fn make_chain(depth: usize) -> Cause {
    let factory = ErrorFactory::new();
    let mut cause: Cause = Arc::new(std::io::Error::other("root"));
    for level in 0..depth {
        cause = Arc::new(factory.create_invocation_error(
            "nested failure",
            level as i64,
            Some(cause),
            None,
            Args::new(),
        ));
    }
    cause
}

// ---------------------------------------------------------------------------
// Benchmark: factory construction
// ---------------------------------------------------------------------------

fn bench_create(c: &mut Criterion) {
    let factory = ErrorFactory::new();
    let callable = CallableRef::named("strlen");

    let mut group = c.benchmark_group("create_invocation_error");
    for n in [0, 4, 16] {
        let args = make_args(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &args, |b, args| {
            b.iter(|| {
                black_box(factory.create_invocation_error(
                    "bad arity",
                    2,
                    None,
                    Some(callable.clone()),
                    args.clone(),
                ))
            });
        });
    }
    group.finish();

    c.bench_function("args_macro_mixed", |b| {
        b.iter(|| black_box(args!["a", "k" => "b", 3, "flag" => true]))
    });
}

// ---------------------------------------------------------------------------
// Benchmark: chain traversal
// ---------------------------------------------------------------------------

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_walk");
    for depth in [1, 8, 64] {
        let head = make_chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &head, |b, head| {
            b.iter(|| black_box(chain(head.as_ref()).count()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_create, bench_chain);
criterion_main!(benches);
