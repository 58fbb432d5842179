use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use std::rc::Rc;

use sequent_benchmarks::grid_walk_task;
use sequent_search::collections::SegmentedVec;
use sequent_search::context::EvaluationContext;
use sequent_search::{EvaluatorRef, HspMaxHeuristic, StateRegistry};
use sequent_task::{OperatorId, TaskProxy};

// ---------------------------------------------------------------------------
// Segmented vector push/pop
// ---------------------------------------------------------------------------

fn bench_segmented_vec(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmented_vec_push_pop");
    for &size in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut vec = SegmentedVec::new();
                for i in 0..n {
                    vec.push(black_box(i as u64));
                }
                while vec.pop().is_some() {}
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Registry: register fresh and duplicate states
// ---------------------------------------------------------------------------

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_successors");
    for &width in &[4usize, 8] {
        let task = grid_walk_task(width, 8);
        group.bench_with_input(BenchmarkId::from_parameter(width), &task, |b, task| {
            b.iter_batched(
                || StateRegistry::new(Rc::clone(task)),
                |mut registry| {
                    let proxy = TaskProxy::new(task);
                    // Walk one variable to the top twice: the second pass
                    // registers only duplicates.
                    for _ in 0..2 {
                        let mut state = registry.initial_state();
                        for step in 0..7usize {
                            let op = proxy.operators().get(OperatorId(step));
                            state = registry.successor_state(&state, &op);
                        }
                        black_box(state.id());
                    }
                    black_box(registry.size())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// h^max single evaluation
// ---------------------------------------------------------------------------

fn bench_hmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("hmax_initial_state");
    for &width in &[4usize, 8, 16] {
        let task = grid_walk_task(width, 8);
        let heuristic: EvaluatorRef = Rc::new(
            HspMaxHeuristic::new(&task)
                .expect("no axioms")
                .with_cache(false),
        );
        let state = StateRegistry::new(Rc::clone(&task)).initial_state();
        group.bench_with_input(
            BenchmarkId::from_parameter(width),
            &heuristic,
            |b, heuristic| {
                b.iter(|| {
                    let mut ctx = EvaluationContext::new(&state, 0, false, false);
                    black_box(ctx.value_or_infinity(heuristic))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_segmented_vec, bench_registry, bench_hmax);
criterion_main!(benches);
